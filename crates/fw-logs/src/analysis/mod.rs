//! Batch-scoped queries: anomaly detection, statistics and search.
//!
//! Every query validates its filter before touching the store and reads
//! the batch exactly once, so all breakdowns of a response share one scope.

pub mod anomalies;
pub mod search;
pub mod statistics;

use std::sync::Arc;

use crate::error::LogResult;
use crate::store::{LogStore, RecordFilter};

pub use anomalies::{
    AlertLevel, Anomaly, AnomalyDetector, AnomalyKind, AnomalyReport, AnomalyThresholds,
};
pub use search::{SearchResult, SearchRow};
pub use statistics::{CountItem, ProtocolRatio, StatisticsAggregator, StatisticsReport};

/// Read-only query service over a `LogStore`.
#[derive(Clone)]
pub struct LogAnalyzer {
    store: Arc<dyn LogStore>,
    detector: AnomalyDetector,
    aggregator: StatisticsAggregator,
}

impl LogAnalyzer {
    pub fn new(store: Arc<dyn LogStore>, thresholds: AnomalyThresholds) -> Self {
        Self {
            store,
            detector: AnomalyDetector::new(thresholds),
            aggregator: StatisticsAggregator::default(),
        }
    }

    pub async fn statistics(&self, filter: &RecordFilter) -> LogResult<StatisticsReport> {
        filter.validate()?;
        let records = self.store.query(filter).await?;
        let report = self.aggregator.aggregate(&records);
        tracing::debug!(file_id = %filter.file_id, total = report.total, "statistics computed");
        Ok(report)
    }

    pub async fn anomalies(&self, filter: &RecordFilter) -> LogResult<AnomalyReport> {
        filter.validate()?;
        let records = self.store.query(filter).await?;
        let anomalies = self.detector.detect(&records);
        if !anomalies.is_empty() {
            tracing::info!(file_id = %filter.file_id, count = anomalies.len(), "anomalies detected");
        }
        Ok(AnomalyReport { anomalies })
    }

    pub async fn search(
        &self,
        filter: &RecordFilter,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> LogResult<SearchResult> {
        filter.validate()?;
        let page = search::resolve_page(page, limit)?;
        let found = self.store.search(filter, page).await?;
        Ok(SearchResult {
            total: found.total,
            page: page.number,
            limit: page.limit,
            data: found.records.into_iter().map(SearchRow::from).collect(),
        })
    }
}
