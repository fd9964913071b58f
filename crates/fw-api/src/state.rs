//! Shared application state for the Axum server.
//!
//! Supports two modes:
//! - **Database mode**: records live in PostgreSQL (production).
//! - **In-memory mode**: records live in a `MemoryLogStore` (tests and development).

use std::sync::Arc;

use sqlx::PgPool;

use fw_logs::{
    AnomalyThresholds, IngestionPipeline, LogAnalyzer, LogStore, MemoryLogStore, ParserRegistry,
};

use crate::db::PgLogStore;

/// Shared application state, cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Parser set, built once at startup.
    pub registry: Arc<ParserRegistry>,
    pub pipeline: IngestionPipeline,
    pub analyzer: LogAnalyzer,
}

impl AppState {
    /// Build state around any store.
    pub fn with_store(store: Arc<dyn LogStore>, thresholds: AnomalyThresholds) -> Self {
        let registry = Arc::new(ParserRegistry::with_defaults());
        Self {
            pipeline: IngestionPipeline::new(registry.clone(), store.clone()),
            analyzer: LogAnalyzer::new(store, thresholds),
            registry,
        }
    }

    /// Create state backed by a PostgreSQL pool.
    pub fn with_pool(pool: PgPool, thresholds: AnomalyThresholds) -> Self {
        Self::with_store(Arc::new(PgLogStore::new(pool)), thresholds)
    }

    /// Create state backed by a `MemoryLogStore`.
    pub fn in_memory(thresholds: AnomalyThresholds) -> Self {
        Self::with_store(Arc::new(MemoryLogStore::new()), thresholds)
    }

    /// Create in-memory state with default thresholds (for tests).
    pub fn new() -> Self {
        Self::in_memory(AnomalyThresholds::default())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
