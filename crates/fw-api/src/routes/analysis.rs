//! Batch statistics and anomaly endpoints.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use fw_logs::{AnomalyReport, Direction, FirewallType, RecordFilter, StatisticsReport};

use crate::error::ApiResult;
use crate::state::AppState;

/// Query parameters shared by the analysis endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    pub file_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub protocol: Option<String>,
    pub firewall_type: Option<String>,
    pub direction: Option<Direction>,
}

/// Parse an optional firewall type tag, rejecting unknown values.
pub(crate) fn parse_firewall_type(raw: Option<String>) -> ApiResult<Option<FirewallType>> {
    raw.filter(|t| !t.trim().is_empty())
        .map(|t| t.parse::<FirewallType>())
        .transpose()
        .map_err(Into::into)
}

impl AnalysisQuery {
    fn into_filter(self) -> ApiResult<RecordFilter> {
        Ok(RecordFilter {
            file_id: self.file_id.unwrap_or_default(),
            from: self.from,
            to: self.to,
            protocol: self.protocol,
            firewall_type: parse_firewall_type(self.firewall_type)?,
            direction: self.direction,
            ..RecordFilter::default()
        })
    }
}

/// GET /api/v1/analysis/statistics: aggregate counters for one batch.
pub async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<StatisticsReport>> {
    let filter = query.into_filter()?;
    let report = state.analyzer.statistics(&filter).await?;
    Ok(Json(report))
}

/// GET /api/v1/analysis/anomalies: rule-based anomalies for one batch.
pub async fn anomalies(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<AnomalyReport>> {
    let filter = query.into_filter()?;
    let report = state.analyzer.anomalies(&filter).await?;
    Ok(Json(report))
}
