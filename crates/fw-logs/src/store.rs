//! Append-only persistence for canonical records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LogError, LogResult};
use crate::types::{Action, CanonicalLogRecord, Direction, FirewallType};

/// Predicate over canonical records, always scoped to one batch.
///
/// Every query path (statistics, anomalies, search) goes through the same
/// `matches` semantics so that breakdowns of one request agree with each
/// other. `from`/`to` are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub file_id: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub action: Option<Action>,
    pub protocol: Option<String>,
    pub source_ip: Option<String>,
    pub destination_ip: Option<String>,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
    pub firewall_type: Option<FirewallType>,
    pub direction: Option<Direction>,
}

impl RecordFilter {
    /// Filter selecting every record of a batch.
    pub fn for_file(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            ..Self::default()
        }
    }

    /// Reject a filter that is not scoped to a batch.
    pub fn validate(&self) -> LogResult<()> {
        if self.file_id.trim().is_empty() {
            return Err(LogError::MissingParameter("file_id"));
        }
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(LogError::InvalidParameter(format!(
                "'from' ({from}) is after 'to' ({to})"
            )));
        }
        Ok(())
    }

    pub fn matches(&self, record: &CanonicalLogRecord) -> bool {
        record.file_id == self.file_id
            && self.from.is_none_or(|from| record.timestamp >= from)
            && self.to.is_none_or(|to| record.timestamp <= to)
            && self.action.as_ref().is_none_or(|a| &record.action == a)
            && self.protocol.as_ref().is_none_or(|p| &record.protocol == p)
            && self.source_ip.as_ref().is_none_or(|ip| &record.source_ip == ip)
            && self
                .destination_ip
                .as_ref()
                .is_none_or(|ip| &record.destination_ip == ip)
            && self
                .source_port
                .is_none_or(|port| record.source_port == Some(port))
            && self
                .destination_port
                .is_none_or(|port| record.destination_port == Some(port))
            && self
                .firewall_type
                .is_none_or(|t| record.firewall_type == t)
            && self
                .direction
                .as_ref()
                .is_none_or(|d| record.direction.as_ref() == Some(d))
    }
}

/// One page of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> usize {
        (self.number.saturating_sub(1) as usize) * self.limit as usize
    }
}

/// Matching records for one page plus the total match count.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub total: usize,
    pub records: Vec<CanonicalLogRecord>,
}

/// Append-only persistence for canonical records.
///
/// Enables an in-memory store for tests and development and a database
/// store in production. Records are never updated.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persist one record.
    async fn append(&self, record: &CanonicalLogRecord) -> LogResult<()>;

    /// All records matching `filter`, oldest first.
    async fn query(&self, filter: &RecordFilter) -> LogResult<Vec<CanonicalLogRecord>>;

    /// One page of records matching `filter`, oldest first.
    async fn search(&self, filter: &RecordFilter, page: Page) -> LogResult<SearchPage>;
}
