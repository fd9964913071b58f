//! Paginated record listing for one batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::statistics::UNKNOWN_DIRECTION;
use crate::error::{LogError, LogResult};
use crate::store::Page;
use crate::types::{Action, CanonicalLogRecord, FirewallType};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 500;

/// Resolve optional paging parameters, rejecting zero values.
pub fn resolve_page(page: Option<u32>, limit: Option<u32>) -> LogResult<Page> {
    let number = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if number == 0 {
        return Err(LogError::InvalidParameter("page must be at least 1".into()));
    }
    if limit == 0 {
        return Err(LogError::InvalidParameter("limit must be at least 1".into()));
    }
    Ok(Page {
        number,
        limit: limit.min(MAX_LIMIT),
    })
}

/// A record as listed by search (the raw line is left out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRow {
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub protocol: String,
    pub source_ip: String,
    pub source_port: Option<u16>,
    pub destination_ip: String,
    pub destination_port: Option<u16>,
    pub direction: String,
    pub firewall_type: FirewallType,
}

impl From<CanonicalLogRecord> for SearchRow {
    fn from(r: CanonicalLogRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            action: r.action,
            protocol: r.protocol,
            source_ip: r.source_ip,
            source_port: r.source_port,
            destination_ip: r.destination_ip,
            destination_port: r.destination_port,
            direction: r
                .direction
                .map_or_else(|| UNKNOWN_DIRECTION.to_string(), |d| d.to_string()),
            firewall_type: r.firewall_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<SearchRow>,
}
