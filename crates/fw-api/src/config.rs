//! API server configuration.

use serde::Deserialize;
use std::str::FromStr;

use fw_logs::AnomalyThresholds;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. Records are kept in memory when unset.
    pub database_url: Option<String>,
    /// Allowed CORS origins (e.g., ["http://localhost:4200"]). Empty allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Upper bound on an uploaded log file, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Anomaly rule thresholds.
    #[serde(default)]
    pub thresholds: AnomalyThresholds,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl ApiConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("FW_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "FW_PORT").unwrap_or(defaults.port),
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            cors_origins: lookup("FW_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            max_upload_bytes: parse_var(&lookup, "FW_MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
            thresholds: AnomalyThresholds {
                multiple_drop: parse_var(&lookup, "FW_MULTIPLE_DROP_THRESHOLD")
                    .unwrap_or(defaults.thresholds.multiple_drop),
                brute_force_ports: parse_var(&lookup, "FW_BRUTE_FORCE_PORTS_THRESHOLD")
                    .unwrap_or(defaults.thresholds.brute_force_ports),
            },
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            cors_origins: vec![],
            max_upload_bytes: default_max_upload_bytes(),
            thresholds: AnomalyThresholds::default(),
        }
    }
}
