//! Grouped counts and top-N breakdowns over one filtered record set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::types::{Action, CanonicalLogRecord};

/// Label used for records that carry no direction.
pub const UNKNOWN_DIRECTION: &str = "UNKNOWN";

/// Default length of the top source/destination IP lists.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountItem {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRatio {
    pub protocol: String,
    pub allow_count: usize,
    pub drop_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub total: usize,
    pub allowed: usize,
    pub dropped: usize,
    pub by_protocol: Vec<CountItem>,
    pub ratio_by_protocol: Vec<ProtocolRatio>,
    pub by_direction: Vec<CountItem>,
    pub by_firewall_type: Vec<CountItem>,
    pub by_source_port: Vec<CountItem>,
    pub by_destination_port: Vec<CountItem>,
    pub top_source_ip: Vec<CountItem>,
    pub top_destination_ip: Vec<CountItem>,
}

/// Computes every breakdown from the same slice, so they all share one scope.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsAggregator {
    top_n: usize,
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

impl StatisticsAggregator {
    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn aggregate(&self, records: &[CanonicalLogRecord]) -> StatisticsReport {
        let mut by_protocol: HashMap<&str, usize> = HashMap::new();
        let mut by_direction: HashMap<&str, usize> = HashMap::new();
        let mut by_firewall_type: HashMap<&str, usize> = HashMap::new();
        let mut by_source_port: HashMap<u16, usize> = HashMap::new();
        let mut by_destination_port: HashMap<u16, usize> = HashMap::new();
        let mut by_source_ip: HashMap<&str, usize> = HashMap::new();
        let mut by_destination_ip: HashMap<&str, usize> = HashMap::new();
        // BTreeMap: ratios come out sorted by protocol.
        let mut ratios: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

        let mut allowed = 0;
        let mut dropped = 0;

        for r in records {
            let ratio = ratios.entry(&r.protocol).or_default();
            match r.action {
                Action::Allow => {
                    allowed += 1;
                    ratio.0 += 1;
                }
                Action::Drop => {
                    dropped += 1;
                    ratio.1 += 1;
                }
                Action::Other(_) => {}
            }

            *by_protocol.entry(&r.protocol).or_default() += 1;
            let direction = r.direction.as_ref().map_or(UNKNOWN_DIRECTION, |d| d.as_str());
            *by_direction.entry(direction).or_default() += 1;
            *by_firewall_type.entry(r.firewall_type.as_str()).or_default() += 1;
            if let Some(port) = r.source_port {
                *by_source_port.entry(port).or_default() += 1;
            }
            if let Some(port) = r.destination_port {
                *by_destination_port.entry(port).or_default() += 1;
            }
            *by_source_ip.entry(&r.source_ip).or_default() += 1;
            *by_destination_ip.entry(&r.destination_ip).or_default() += 1;
        }

        StatisticsReport {
            total: records.len(),
            allowed,
            dropped,
            by_protocol: ranked(by_protocol, None),
            ratio_by_protocol: ratios
                .into_iter()
                .map(|(protocol, (allow_count, drop_count))| ProtocolRatio {
                    protocol: protocol.to_string(),
                    allow_count,
                    drop_count,
                })
                .collect(),
            by_direction: ranked(by_direction, None),
            by_firewall_type: ranked(by_firewall_type, None),
            by_source_port: ranked(by_source_port, None),
            by_destination_port: ranked(by_destination_port, None),
            top_source_ip: ranked(by_source_ip, Some(self.top_n)),
            top_destination_ip: ranked(by_destination_ip, Some(self.top_n)),
        }
    }
}

/// Count descending, then label ascending; optionally truncated.
fn ranked<K>(counts: HashMap<K, usize>, limit: Option<usize>) -> Vec<CountItem>
where
    K: Eq + Hash + Ord + ToString,
{
    let mut items: Vec<(K, usize)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(n) = limit {
        items.truncate(n);
    }
    items
        .into_iter()
        .map(|(label, count)| CountItem {
            label: label.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, FirewallType};
    use chrono::{TimeZone, Utc};

    fn rec(action: Action, protocol: &str, src: &str, dst_port: Option<u16>) -> CanonicalLogRecord {
        CanonicalLogRecord {
            file_id: "batch".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            action,
            protocol: protocol.into(),
            source_ip: src.into(),
            source_port: None,
            destination_ip: "10.0.0.1".into(),
            destination_port: dst_port,
            direction: None,
            firewall_type: FirewallType::FortiGate,
            raw_line: String::new(),
        }
    }

    fn count(items: &[CountItem], label: &str) -> usize {
        items
            .iter()
            .find(|i| i.label == label)
            .map_or(0, |i| i.count)
    }

    #[test]
    fn totals_and_ratios() {
        let records = vec![
            rec(Action::Allow, "TCP", "1.1.1.1", Some(443)),
            rec(Action::Drop, "TCP", "1.1.1.1", Some(22)),
            rec(Action::Drop, "UDP", "2.2.2.2", Some(53)),
            rec(Action::Other("LOGIN".into()), "unknown", "3.3.3.3", None),
        ];
        let report = StatisticsAggregator::default().aggregate(&records);
        assert_eq!(report.total, 4);
        assert_eq!(report.allowed, 1);
        assert_eq!(report.dropped, 2);
        assert_eq!(count(&report.by_protocol, "TCP"), 2);
        assert_eq!(
            report.ratio_by_protocol,
            vec![
                ProtocolRatio {
                    protocol: "TCP".into(),
                    allow_count: 1,
                    drop_count: 1
                },
                ProtocolRatio {
                    protocol: "UDP".into(),
                    allow_count: 0,
                    drop_count: 1
                },
                ProtocolRatio {
                    protocol: "unknown".into(),
                    allow_count: 0,
                    drop_count: 0
                },
            ]
        );
    }

    #[test]
    fn missing_direction_is_unknown_and_missing_ports_are_skipped() {
        let mut with_dir = rec(Action::Allow, "TCP", "1.1.1.1", None);
        with_dir.direction = Some(Direction::Outbound);
        let records = vec![with_dir, rec(Action::Allow, "TCP", "1.1.1.1", None)];
        let report = StatisticsAggregator::default().aggregate(&records);
        assert_eq!(count(&report.by_direction, "OUTBOUND"), 1);
        assert_eq!(count(&report.by_direction, UNKNOWN_DIRECTION), 1);
        assert!(report.by_destination_port.is_empty());
        assert!(report.by_source_port.is_empty());
        assert_eq!(count(&report.by_firewall_type, "FORTIGATE"), 2);
    }

    #[test]
    fn top_ips_are_truncated_and_tie_broken_by_label() {
        let mut records = Vec::new();
        for i in 0..12 {
            records.push(rec(Action::Drop, "TCP", &format!("10.0.0.{i}"), Some(80)));
        }
        records.push(rec(Action::Drop, "TCP", "10.0.0.5", Some(80)));

        let report = StatisticsAggregator::default().aggregate(&records);
        assert_eq!(report.top_source_ip.len(), 10);
        assert_eq!(report.top_source_ip[0].label, "10.0.0.5");
        assert_eq!(report.top_source_ip[0].count, 2);
        // Remaining ties sort lexically.
        assert_eq!(report.top_source_ip[1].label, "10.0.0.0");
        assert_eq!(report.top_source_ip[2].label, "10.0.0.1");
        assert_eq!(report.top_source_ip[3].label, "10.0.0.10");
    }

    #[test]
    fn ports_sort_numerically_on_ties() {
        let records = vec![
            rec(Action::Drop, "TCP", "1.1.1.1", Some(8080)),
            rec(Action::Drop, "TCP", "1.1.1.1", Some(22)),
            rec(Action::Drop, "TCP", "1.1.1.1", Some(443)),
            rec(Action::Drop, "TCP", "1.1.1.1", Some(443)),
        ];
        let report = StatisticsAggregator::default().aggregate(&records);
        let labels: Vec<_> = report.by_destination_port.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["443", "22", "8080"]);
    }

    #[test]
    fn empty_input() {
        let report = StatisticsAggregator::default().aggregate(&[]);
        assert_eq!(report, StatisticsReport::default());
    }

    #[test]
    fn custom_top_n() {
        let records = vec![
            rec(Action::Drop, "TCP", "1.1.1.1", None),
            rec(Action::Drop, "TCP", "2.2.2.2", None),
        ];
        let report = StatisticsAggregator::with_top_n(1).aggregate(&records);
        assert_eq!(report.top_source_ip.len(), 1);
        assert_eq!(report.top_destination_ip.len(), 1);
    }
}
