//! Log upload endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use fw_logs::FirewallType;
use fw_logs::pipeline::CandidateCount;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for an upload.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Declared vendor format of the uploaded file.
    pub firewall_type: Option<String>,
}

/// Response body for an accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_id: String,
    pub lines_processed: usize,
    pub lines_ignored: usize,
    pub warning: Option<String>,
    pub candidates: Vec<CandidateCount>,
}

fn allowed_types(state: &AppState) -> String {
    state
        .registry
        .supported_types()
        .iter()
        .map(FirewallType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// POST /api/v1/logs/upload?firewall_type=..: ingest a raw log file.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    let Some(raw_type) = query.firewall_type.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::BadRequest(format!(
            "firewall_type is required, allowed values: {}",
            allowed_types(&state)
        )));
    };
    let firewall_type: FirewallType = raw_type.parse()?;
    if state.registry.get(firewall_type).is_none() {
        return Err(ApiError::BadRequest(format!(
            "firewall type {firewall_type} is not enabled, allowed values: {}",
            allowed_types(&state)
        )));
    }

    let body = String::from_utf8(body.to_vec())
        .map_err(|e| ApiError::BadRequest(format!("uploaded log file is not valid UTF-8: {e}")))?;
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("uploaded log file is empty".into()));
    }

    let lines: Vec<String> = body.lines().map(String::from).collect();
    let file_id = uuid::Uuid::now_v7().to_string();

    tracing::info!(
        file_id = %file_id,
        format = %firewall_type,
        lines = lines.len(),
        "log file received"
    );

    let summary = state
        .pipeline
        .process_batch(&lines, firewall_type, &file_id)
        .await;

    Ok(Json(UploadResponse {
        message: format!("{} log file processed", firewall_type),
        file_id,
        lines_processed: summary.processed,
        lines_ignored: summary.ignored,
        warning: summary.warning,
        candidates: summary.candidates,
    }))
}

/// GET /api/v1/logs/supported-types: list accepted firewall formats.
pub async fn supported_types(State(state): State<AppState>) -> Json<Vec<FirewallType>> {
    Json(state.registry.supported_types())
}
