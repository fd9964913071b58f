//! FortiGate `key=value` log parser.
//!
//! ```text
//! date=2024-01-15 time=12:00:01 devname="FG-100F" type="traffic" subtype="forward"
//! srcip=10.0.0.1 srcport=51234 dstip=8.8.8.8 dstport=53 proto=17 action="accept"
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::parsers::{FormatParser, ParseFailure, parse_ip, parse_port, parse_timestamp};
use crate::types::{Action, Direction, FirewallType, ParsedLog};

// key=value or key="quoted value"
static RE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)=("[^"]*"|[^ ]*)"#).unwrap());

pub struct FortiGateParser;

impl FormatParser for FortiGateParser {
    fn firewall_type(&self) -> FirewallType {
        FirewallType::FortiGate
    }

    fn can_parse(&self, line: &str) -> bool {
        line.contains("date=")
            && line.contains("time=")
            && (line.contains("devname=") || line.contains("type=") || line.contains("subtype="))
    }

    fn parse(&self, line: &str) -> Result<ParsedLog, ParseFailure> {
        let fields = split_pairs(line);

        let date = required(&fields, "date")?;
        let time = required(&fields, "time")?;
        let raw_action = required(&fields, "action")?;
        let timestamp = parse_timestamp(date, time)?;

        let action = normalize_action(raw_action);
        let protocol = first_of(&fields, &["proto", "service"])
            .unwrap_or("unknown")
            .to_string();

        let source_ip = first_of(&fields, &["srcip", "src"])
            .ok_or(ParseFailure::MissingField("srcip"))
            .and_then(parse_ip)?;
        let destination_ip = first_of(&fields, &["dstip", "dst"])
            .ok_or(ParseFailure::MissingField("dstip"))
            .and_then(parse_ip)?;

        let source_port = parse_port(first_of(&fields, &["srcport", "sport", "src_port"]));
        let destination_port = parse_port(first_of(&fields, &["dstport", "dport", "dst_port"]));

        Ok(ParsedLog {
            timestamp,
            action,
            protocol,
            source_ip,
            source_port,
            destination_ip,
            destination_port,
            direction: infer_direction(&fields, raw_action),
            firewall_type: FirewallType::FortiGate,
            raw_line: line.trim().to_string(),
        })
    }
}

/// Tokenize `key=value` pairs; quoted values keep their spaces and lose the quotes.
fn split_pairs(line: &str) -> HashMap<&str, &str> {
    RE_PAIR
        .captures_iter(line)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            (!value.is_empty()).then_some((key, value))
        })
        .collect()
}

fn required<'a>(fields: &HashMap<&str, &'a str>, key: &'static str) -> Result<&'a str, ParseFailure> {
    fields.get(key).copied().ok_or(ParseFailure::MissingField(key))
}

fn first_of<'a>(fields: &HashMap<&str, &'a str>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| fields.get(k).copied())
}

fn normalize_action(raw: &str) -> Action {
    match raw.to_ascii_lowercase().as_str() {
        "accept" => Action::Allow,
        "deny" | "denied" | "blocked" => Action::Drop,
        other => Action::Other(other.to_ascii_uppercase()),
    }
}

/// Explicit `direction` wins. Otherwise forwarded traffic is treated as
/// outbound and blocked traffic as inbound. The blocked rule is only an
/// approximation: FortiGate does not say which side initiated the flow.
fn infer_direction(fields: &HashMap<&str, &str>, raw_action: &str) -> Option<Direction> {
    if let Some(explicit) = fields.get("direction") {
        return Some(Direction::from_canonical(explicit));
    }
    if fields.get("subtype").is_some_and(|s| s.eq_ignore_ascii_case("forward")) {
        return Some(Direction::Outbound);
    }
    if raw_action.eq_ignore_ascii_case("blocked") {
        return Some(Direction::Inbound);
    }
    None
}
