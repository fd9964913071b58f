//! Windows Defender Firewall log parser.
//!
//! `pfirewall.log` lines are whitespace separated with a fixed column order:
//!
//! ```text
//! date time action protocol src-ip dst-ip src-port dst-port size tcpflags
//! tcpsyn tcpack tcpwin icmptype icmpcode info path
//! ```
//!
//! Header lines start with `#`. Missing values are written as `-`.

use crate::parsers::{FormatParser, ParseFailure, parse_ip, parse_port, parse_timestamp};
use crate::types::{Action, Direction, FirewallType, ParsedLog};

/// Columns up to and including the destination port.
const MIN_FIELDS: usize = 8;

pub struct WindowsDefenderParser;

impl FormatParser for WindowsDefenderParser {
    fn firewall_type(&self) -> FirewallType {
        FirewallType::WindowsDefender
    }

    fn can_parse(&self, line: &str) -> bool {
        !line.starts_with('#') && (line.contains("DROP") || line.contains("ALLOW"))
    }

    fn parse(&self, line: &str) -> Result<ParsedLog, ParseFailure> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < MIN_FIELDS {
            return Err(ParseFailure::TooFewFields {
                expected: MIN_FIELDS,
                found: parts.len(),
            });
        }

        let timestamp = parse_timestamp(parts[0], parts[1])?;
        let action = non_sentinel(parts[2])
            .map(Action::from_canonical)
            .ok_or(ParseFailure::MissingField("action"))?;
        let protocol = non_sentinel(parts[3])
            .ok_or(ParseFailure::MissingField("protocol"))?
            .to_string();
        let source_ip = parse_ip(parts[4])?;
        let destination_ip = parse_ip(parts[5])?;

        // The path column is the last one, but older logs omit trailing
        // columns, so look for the token anywhere.
        let direction = parts.iter().find_map(|p| match *p {
            "SEND" => Some(Direction::Outbound),
            "RECEIVE" => Some(Direction::Inbound),
            _ => None,
        });

        Ok(ParsedLog {
            timestamp,
            action,
            protocol,
            source_ip,
            source_port: parse_port(Some(parts[6])),
            destination_ip,
            destination_port: parse_port(Some(parts[7])),
            direction,
            firewall_type: FirewallType::WindowsDefender,
            raw_line: line.trim().to_string(),
        })
    }
}

fn non_sentinel(s: &str) -> Option<&str> {
    (s != "-").then_some(s)
}
