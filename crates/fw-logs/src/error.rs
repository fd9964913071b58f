//! Firewall log error types.

use thiserror::Error;

/// Errors surfaced to callers of the ingestion and analysis APIs.
///
/// Per-line problems never show up here; they are folded into the batch
/// counters (see [`ParseFailure`](crate::parsers::ParseFailure)).
#[derive(Debug, Error)]
pub enum LogError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("log store error: {0}")]
    Store(String),
}

/// Convenience alias for firewall log results.
pub type LogResult<T> = Result<T, LogError>;
