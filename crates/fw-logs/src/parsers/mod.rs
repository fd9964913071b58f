//! Vendor log parsers behind a single `FormatParser` capability.
//!
//! Supports Windows Defender Firewall (`pfirewall.log`, fixed-position,
//! space-delimited) and FortiGate (`key=value` pairs).

pub mod fortigate;
pub mod windows_defender;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::net::IpAddr;
use thiserror::Error;

use crate::types::{FirewallType, ParsedLog};

pub use fortigate::FortiGateParser;
pub use windows_defender::WindowsDefenderParser;

/// Why a single line could not become a canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("invalid IP address '{0}'")]
    InvalidIp(String),
}

/// Recognizer + extractor for one vendor log format.
pub trait FormatParser: Send + Sync {
    /// Format this parser produces.
    fn firewall_type(&self) -> FirewallType;

    /// Cheap marker check used to route lines and to build mismatch
    /// diagnostics. Must depend on the line content only.
    fn can_parse(&self, line: &str) -> bool;

    /// Extract and normalize the canonical fields.
    fn parse(&self, line: &str) -> Result<ParsedLog, ParseFailure>;
}

/// The default parser set, in registry order.
pub fn all_parsers() -> Vec<Box<dyn FormatParser>> {
    vec![
        Box::new(WindowsDefenderParser),
        Box::new(FortiGateParser),
    ]
}

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Build a UTC timestamp from separate date and time columns.
pub(crate) fn parse_timestamp(date: &str, time: &str) -> Result<DateTime<Utc>, ParseFailure> {
    let joined = format!("{date} {time}");
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
        .map(|ndt| Utc.from_utc_datetime(&ndt))
        .ok_or(ParseFailure::InvalidTimestamp(joined))
}

/// Validate a textual IPv4/IPv6 address, returning it unchanged.
pub(crate) fn parse_ip(raw: &str) -> Result<String, ParseFailure> {
    raw.parse::<IpAddr>()
        .map(|_| raw.to_string())
        .map_err(|_| ParseFailure::InvalidIp(raw.to_string()))
}

/// Ports are optional: the `-` sentinel and anything non-numeric mean absent.
pub(crate) fn parse_port(raw: Option<&str>) -> Option<u16> {
    match raw {
        None | Some("-") | Some("") => None,
        Some(s) => s.parse().ok(),
    }
}
