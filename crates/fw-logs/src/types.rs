//! Canonical firewall log model shared by every parser and query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::LogError;

// ── Firewall Type ─────────────────────────────────────────────

/// Vendor format tag identifying which parser produced a record.
///
/// Declaration order is the registry order, which is also the
/// tie-break order for format-mismatch suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FirewallType {
    /// Windows Defender Firewall (`pfirewall.log`, space-delimited).
    WindowsDefender,
    /// FortiGate traffic logs (`key=value`).
    #[serde(rename = "FORTIGATE")]
    FortiGate,
}

impl FirewallType {
    pub const ALL: [FirewallType; 2] = [Self::WindowsDefender, Self::FortiGate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WindowsDefender => "WINDOWS_DEFENDER",
            Self::FortiGate => "FORTIGATE",
        }
    }
}

impl std::fmt::Display for FirewallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FirewallType {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<_> = Self::ALL.iter().map(|t| t.as_str()).collect();
                LogError::InvalidParameter(format!(
                    "unknown firewall type '{s}', allowed values: {}",
                    allowed.join(", ")
                ))
            })
    }
}

// ── Action ────────────────────────────────────────────────────

/// Firewall verdict for a connection.
///
/// Vendors that report anything other than an allow/drop synonym keep
/// their own verb, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Allow,
    Drop,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Allow => "ALLOW",
            Self::Drop => "DROP",
            Self::Other(s) => s,
        }
    }

    /// Map the canonical text form back to an action.
    pub fn from_canonical(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "ALLOW" => Self::Allow,
            "DROP" => Self::Drop,
            _ => Self::Other(upper),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_canonical(&s))
    }
}

// ── Direction ─────────────────────────────────────────────────

/// Traffic direction relative to the protected host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Inbound,
    Outbound,
    Other(String),
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
            Self::Other(s) => s,
        }
    }

    pub fn from_canonical(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "INBOUND" => Self::Inbound,
            "OUTBOUND" => Self::Outbound,
            _ => Self::Other(upper),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_canonical(&s))
    }
}

// ── Parsed / Canonical records ────────────────────────────────

/// Canonical fields extracted from one raw line, before it is tied to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLog {
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub protocol: String,
    pub source_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,
    pub destination_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub firewall_type: FirewallType,
    /// Original line, kept for audit.
    pub raw_line: String,
}

impl ParsedLog {
    /// Attach the batch identifier, producing the record handed to the store.
    pub fn into_record(self, file_id: impl Into<String>) -> CanonicalLogRecord {
        CanonicalLogRecord {
            file_id: file_id.into(),
            timestamp: self.timestamp,
            action: self.action,
            protocol: self.protocol,
            source_ip: self.source_ip,
            source_port: self.source_port,
            destination_ip: self.destination_ip,
            destination_port: self.destination_port,
            direction: self.direction,
            firewall_type: self.firewall_type,
            raw_line: self.raw_line,
        }
    }
}

/// A normalized, vendor-independent firewall log record.
///
/// Records are created once during ingestion and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalLogRecord {
    /// Batch identifier assigned by the uploader, opaque to this crate.
    pub file_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub protocol: String,
    pub source_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,
    pub destination_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub firewall_type: FirewallType,
    pub raw_line: String,
}

impl CanonicalLogRecord {
    pub fn is_drop(&self) -> bool {
        self.action == Action::Drop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firewall_type_round_trips_through_str() {
        for t in FirewallType::ALL {
            assert_eq!(t.as_str().parse::<FirewallType>().unwrap(), t);
        }
        assert_eq!(
            "fortigate".parse::<FirewallType>().unwrap(),
            FirewallType::FortiGate
        );
    }

    #[test]
    fn unknown_firewall_type_lists_allowed_values() {
        let err = "checkpoint".parse::<FirewallType>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("WINDOWS_DEFENDER"));
        assert!(msg.contains("FORTIGATE"));
    }

    #[test]
    fn firewall_type_serializes_as_tag() {
        let json = serde_json::to_string(&FirewallType::WindowsDefender).unwrap();
        assert_eq!(json, "\"WINDOWS_DEFENDER\"");
        let json = serde_json::to_string(&FirewallType::FortiGate).unwrap();
        assert_eq!(json, "\"FORTIGATE\"");
    }

    #[test]
    fn action_canonical_forms() {
        assert_eq!(Action::from_canonical("allow"), Action::Allow);
        assert_eq!(Action::from_canonical("DROP"), Action::Drop);
        assert_eq!(
            Action::from_canonical("info-events"),
            Action::Other("INFO-EVENTS".into())
        );
        assert_eq!(serde_json::to_string(&Action::Drop).unwrap(), "\"DROP\"");
    }

    #[test]
    fn direction_canonical_forms() {
        assert_eq!(Direction::from_canonical("outbound"), Direction::Outbound);
        assert_eq!(Direction::from_canonical("INBOUND"), Direction::Inbound);
        assert_eq!(
            Direction::from_canonical("local"),
            Direction::Other("LOCAL".into())
        );
    }

    #[test]
    fn record_skips_absent_optionals() {
        let parsed = ParsedLog {
            timestamp: Utc::now(),
            action: Action::Allow,
            protocol: "TCP".into(),
            source_ip: "1.2.3.4".into(),
            source_port: None,
            destination_ip: "5.6.7.8".into(),
            destination_port: Some(443),
            direction: None,
            firewall_type: FirewallType::WindowsDefender,
            raw_line: "raw".into(),
        };
        let record = parsed.into_record("batch-1");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["file_id"], "batch-1");
        assert!(json.get("source_port").is_none());
        assert!(json.get("direction").is_none());
        assert_eq!(json["destination_port"], 443);
    }
}
