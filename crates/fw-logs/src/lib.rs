//! Firewall log ingestion and analysis for FireWatch.
//!
//! Provides per-vendor line parsers (Windows Defender Firewall, FortiGate)
//! behind the `FormatParser` trait, an immutable `ParserRegistry`, the
//! batch `IngestionPipeline` with format-mismatch diagnostics, a `LogStore`
//! abstraction with an in-memory implementation, and batch-scoped
//! statistics, anomaly detection and search.

pub mod analysis;
pub mod error;
pub mod memory;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod samples;
pub mod store;
pub mod types;

// Re-export key types for convenience
pub use analysis::{
    Anomaly, AnomalyDetector, AnomalyReport, AnomalyThresholds, LogAnalyzer, SearchResult,
    StatisticsAggregator, StatisticsReport,
};
pub use error::{LogError, LogResult};
pub use memory::MemoryLogStore;
pub use parsers::{FormatParser, ParseFailure};
pub use pipeline::{IngestSummary, IngestionPipeline};
pub use registry::ParserRegistry;
pub use store::{LogStore, Page, RecordFilter, SearchPage};
pub use types::{Action, CanonicalLogRecord, Direction, FirewallType, ParsedLog};
