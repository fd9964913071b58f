//! Shared test harness for E2E integration tests.
//!
//! Drives the real API router over an in-memory (or injected) log store,
//! exercising the parsers, the ingestion pipeline and the analyzers
//! through HTTP.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fw_api::config::ApiConfig;
use fw_api::routes::build_router;
use fw_api::state::AppState;
use fw_logs::{AnomalyThresholds, LogStore, MemoryLogStore};

/// End-to-end test harness around one API router.
pub struct TestHarness {
    /// API application state.
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
}

impl TestHarness {
    /// Harness over an empty in-memory store with default thresholds.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryLogStore::new()), AnomalyThresholds::default())
    }

    /// Harness with custom anomaly thresholds.
    pub fn with_thresholds(thresholds: AnomalyThresholds) -> Self {
        Self::with_store(Arc::new(MemoryLogStore::new()), thresholds)
    }

    /// Harness over a caller-supplied store.
    pub fn with_store(store: Arc<dyn LogStore>, thresholds: AnomalyThresholds) -> Self {
        let config = ApiConfig {
            thresholds,
            ..ApiConfig::default()
        };
        let state = AppState::with_store(store, thresholds);
        let router = build_router(state.clone(), &config);
        Self { state, router }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Upload a log file (POST /api/v1/logs/upload).
    pub async fn upload(&self, firewall_type: &str, lines: &[String]) -> (StatusCode, serde_json::Value) {
        let request = Request::post(format!("/api/v1/logs/upload?firewall_type={firewall_type}"))
            .header("content-type", "text/plain")
            .body(Body::from(lines.join("\n")))
            .unwrap();
        self.send(request).await
    }

    /// Upload a file that must be accepted, returning its `file_id`.
    pub async fn upload_ok(&self, firewall_type: &str, lines: &[String]) -> (String, serde_json::Value) {
        let (status, json) = self.upload(firewall_type, lines).await;
        assert_eq!(status, StatusCode::OK, "upload failed: {json}");
        let file_id = json["file_id"].as_str().unwrap().to_string();
        (file_id, json)
    }

    /// GET an arbitrary URI.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// GET /api/v1/analysis/statistics with extra query parameters.
    pub async fn statistics(&self, file_id: &str, extra: &str) -> (StatusCode, serde_json::Value) {
        self.get(&format!("/api/v1/analysis/statistics?file_id={file_id}{extra}"))
            .await
    }

    /// GET /api/v1/analysis/anomalies with extra query parameters.
    pub async fn anomalies(&self, file_id: &str, extra: &str) -> (StatusCode, serde_json::Value) {
        self.get(&format!("/api/v1/analysis/anomalies?file_id={file_id}{extra}"))
            .await
    }

    /// GET /api/v1/search with extra query parameters.
    pub async fn search(&self, file_id: &str, extra: &str) -> (StatusCode, serde_json::Value) {
        self.get(&format!("/api/v1/search?file_id={file_id}{extra}"))
            .await
    }
}

/// Windows Defender line with the given verdict, source, destination port and second offset.
pub fn windows_line(action: &str, source_ip: &str, dst_port: u16, second: u32) -> String {
    format!(
        "2024-01-15 12:{:02}:{:02} {action} TCP {source_ip} 192.168.1.10 40000 {dst_port} 60 S 0 0 64240 - - - RECEIVE",
        second / 60,
        second % 60
    )
}
