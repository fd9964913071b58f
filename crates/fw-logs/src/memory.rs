//! In-memory log store, used by tests and when no database is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::LogResult;
use crate::store::{LogStore, Page, RecordFilter, SearchPage};
use crate::types::CanonicalLogRecord;

/// A log store that keeps every record in a `Vec`, in append order.
#[derive(Default)]
pub struct MemoryLogStore {
    records: RwLock<Vec<CanonicalLogRecord>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all batches.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, record: &CanonicalLogRecord) -> LogResult<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn query(&self, filter: &RecordFilter) -> LogResult<Vec<CanonicalLogRecord>> {
        let records = self.records.read().await;
        let mut matched: Vec<_> = records.iter().filter(|r| filter.matches(r)).cloned().collect();
        // Stable sort keeps append order for equal timestamps.
        matched.sort_by_key(|r| r.timestamp);
        Ok(matched)
    }

    async fn search(&self, filter: &RecordFilter, page: Page) -> LogResult<SearchPage> {
        let matched = self.query(filter).await?;
        let total = matched.len();
        let records = matched
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .collect();
        Ok(SearchPage { total, records })
    }
}
