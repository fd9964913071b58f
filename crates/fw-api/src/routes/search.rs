//! Paginated record search.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use fw_logs::{Action, Direction, RecordFilter, SearchResult};

use crate::error::ApiResult;
use crate::routes::analysis::parse_firewall_type;
use crate::state::AppState;

/// Query parameters for search requests.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub file_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub action: Option<Action>,
    pub protocol: Option<String>,
    pub source_ip: Option<String>,
    pub destination_ip: Option<String>,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
    pub firewall_type: Option<String>,
    pub direction: Option<Direction>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/v1/search: list matching records of one batch, oldest first.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResult>> {
    let filter = RecordFilter {
        file_id: query.file_id.unwrap_or_default(),
        from: query.from,
        to: query.to,
        action: query.action,
        protocol: query.protocol,
        source_ip: query.source_ip,
        destination_ip: query.destination_ip,
        source_port: query.source_port,
        destination_port: query.destination_port,
        firewall_type: parse_firewall_type(query.firewall_type)?,
        direction: query.direction,
    };

    let result = state
        .analyzer
        .search(&filter, query.page, query.limit)
        .await?;
    Ok(Json(result))
}
