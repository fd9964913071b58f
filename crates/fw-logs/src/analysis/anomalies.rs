//! Threshold anomaly rules over the DROP records of one batch.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::CanonicalLogRecord;

/// Default DROP count above which a source IP is flagged.
pub const MULTIPLE_DROP_THRESHOLD: usize = 50;
/// Default distinct destination port count above which a source IP is flagged.
pub const BRUTE_FORCE_PORT_THRESHOLD: usize = 20;

/// Fixed thresholds; both comparisons are strict greater-than.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    pub multiple_drop: usize,
    pub brute_force_ports: usize,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            multiple_drop: MULTIPLE_DROP_THRESHOLD,
            brute_force_ports: BRUTE_FORCE_PORT_THRESHOLD,
        }
    }
}

/// Anomaly rule identifier.
///
/// Declaration order is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    MultipleDrop,
    BruteForce,
}

/// Anomaly severity, ordered low to high. Both rules currently emit `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

/// One flagged source IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub level: AlertLevel,
    pub ip: String,
    /// DROP count (MULTIPLE_DROP).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Distinct destination ports (BRUTE_FORCE).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<usize>,
}

impl Anomaly {
    /// The aggregated figure that crossed the threshold.
    pub fn magnitude(&self) -> usize {
        self.count.or(self.ports).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyDetector {
    thresholds: AnomalyThresholds,
}

impl AnomalyDetector {
    pub fn new(thresholds: AnomalyThresholds) -> Self {
        Self { thresholds }
    }

    /// Evaluate both rules. A source IP may appear once per rule.
    ///
    /// Sorted by rule, then by magnitude descending, then IP ascending.
    pub fn detect(&self, records: &[CanonicalLogRecord]) -> Vec<Anomaly> {
        let mut drops: HashMap<&str, usize> = HashMap::new();
        let mut ports: HashMap<&str, HashSet<u16>> = HashMap::new();

        for record in records.iter().filter(|r| r.is_drop()) {
            *drops.entry(&record.source_ip).or_default() += 1;
            let seen = ports.entry(&record.source_ip).or_default();
            if let Some(port) = record.destination_port {
                seen.insert(port);
            }
        }

        let mut anomalies: Vec<Anomaly> = drops
            .into_iter()
            .filter(|&(_, count)| count > self.thresholds.multiple_drop)
            .map(|(ip, count)| Anomaly {
                kind: AnomalyKind::MultipleDrop,
                level: AlertLevel::High,
                ip: ip.to_string(),
                count: Some(count),
                ports: None,
            })
            .collect();

        anomalies.extend(
            ports
                .into_iter()
                .map(|(ip, set)| (ip, set.len()))
                .filter(|&(_, distinct)| distinct > self.thresholds.brute_force_ports)
                .map(|(ip, distinct)| Anomaly {
                    kind: AnomalyKind::BruteForce,
                    level: AlertLevel::High,
                    ip: ip.to_string(),
                    count: None,
                    ports: Some(distinct),
                }),
        );

        anomalies.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| b.magnitude().cmp(&a.magnitude()))
                .then_with(|| a.ip.cmp(&b.ip))
        });
        anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, FirewallType};
    use chrono::{TimeZone, Utc};

    fn drop_from(ip: &str, port: Option<u16>) -> CanonicalLogRecord {
        CanonicalLogRecord {
            file_id: "batch".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            action: Action::Drop,
            protocol: "TCP".into(),
            source_ip: ip.into(),
            source_port: Some(40000),
            destination_ip: "10.0.0.1".into(),
            destination_port: port,
            direction: None,
            firewall_type: FirewallType::WindowsDefender,
            raw_line: String::new(),
        }
    }

    fn drops(ip: &str, n: usize) -> Vec<CanonicalLogRecord> {
        (0..n).map(|_| drop_from(ip, Some(22))).collect()
    }

    fn port_scan(ip: &str, distinct: u16) -> Vec<CanonicalLogRecord> {
        (0..distinct).map(|p| drop_from(ip, Some(1000 + p))).collect()
    }

    #[test]
    fn multiple_drop_above_threshold() {
        let found = AnomalyDetector::default().detect(&drops("9.9.9.9", 51));
        assert_eq!(
            found,
            vec![Anomaly {
                kind: AnomalyKind::MultipleDrop,
                level: AlertLevel::High,
                ip: "9.9.9.9".into(),
                count: Some(51),
                ports: None,
            }]
        );
    }

    #[test]
    fn multiple_drop_at_or_below_threshold() {
        let detector = AnomalyDetector::default();
        assert!(detector.detect(&drops("9.9.9.9", 49)).is_empty());
        assert!(detector.detect(&drops("9.9.9.9", 50)).is_empty());
    }

    #[test]
    fn allowed_traffic_never_counts() {
        let mut records = drops("9.9.9.9", 50);
        let mut allowed = drop_from("9.9.9.9", Some(22));
        allowed.action = Action::Allow;
        records.push(allowed);
        assert!(AnomalyDetector::default().detect(&records).is_empty());
    }

    #[test]
    fn brute_force_above_threshold() {
        let found = AnomalyDetector::default().detect(&port_scan("8.8.8.8", 21));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AnomalyKind::BruteForce);
        assert_eq!(found[0].ip, "8.8.8.8");
        assert_eq!(found[0].ports, Some(21));
        assert_eq!(found[0].count, None);
    }

    #[test]
    fn brute_force_at_threshold_is_quiet() {
        assert!(AnomalyDetector::default().detect(&port_scan("8.8.8.8", 20)).is_empty());
    }

    #[test]
    fn repeated_ports_count_once_and_missing_ports_are_skipped() {
        let mut records = port_scan("8.8.8.8", 20);
        records.extend(port_scan("8.8.8.8", 20));
        records.push(drop_from("8.8.8.8", None));
        assert!(AnomalyDetector::default().detect(&records).is_empty());
    }

    #[test]
    fn same_ip_can_trigger_both_rules() {
        let mut records = port_scan("7.7.7.7", 25);
        records.extend(drops("7.7.7.7", 30));
        let found = AnomalyDetector::default().detect(&records);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, AnomalyKind::MultipleDrop);
        assert_eq!(found[0].count, Some(55));
        assert_eq!(found[1].kind, AnomalyKind::BruteForce);
        assert_eq!(found[1].ports, Some(26));
    }

    #[test]
    fn output_is_sorted() {
        let mut records = drops("1.1.1.1", 60);
        records.extend(drops("2.2.2.2", 80));
        records.extend(drops("0.0.0.9", 60));
        let found = AnomalyDetector::default().detect(&records);
        let ips: Vec<_> = found.iter().map(|a| a.ip.as_str()).collect();
        assert_eq!(ips, vec!["2.2.2.2", "0.0.0.9", "1.1.1.1"]);
    }

    #[test]
    fn custom_thresholds() {
        let detector = AnomalyDetector::new(AnomalyThresholds {
            multiple_drop: 2,
            brute_force_ports: 1,
        });
        let found = detector.detect(&port_scan("3.3.3.3", 3));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn serializes_type_field() {
        let json = serde_json::to_value(&AnomalyDetector::default().detect(&drops("9.9.9.9", 51))[0]).unwrap();
        assert_eq!(json["type"], "MULTIPLE_DROP");
        assert_eq!(json["level"], "HIGH");
        assert_eq!(json["count"], 51);
        assert!(json.get("ports").is_none());
    }

    #[test]
    fn alert_levels_order_and_serialize() {
        assert!(AlertLevel::Low < AlertLevel::Medium);
        assert!(AlertLevel::Medium < AlertLevel::High);
        let json = serde_json::to_string(&[AlertLevel::Low, AlertLevel::Medium]).unwrap();
        assert_eq!(json, r#"["LOW","MEDIUM"]"#);
    }
}
