//! Immutable, ordered set of format parsers.
//!
//! Built once at startup and shared by reference; the ingestion pipeline
//! looks parsers up by `FirewallType` and scans all of them for diagnostics.

use std::collections::HashMap;

use crate::parsers::{self, FormatParser};
use crate::types::FirewallType;

pub struct ParserRegistry {
    parsers: Vec<Box<dyn FormatParser>>,
    /// Map from firewall type → index into `parsers`.
    index: HashMap<FirewallType, usize>,
}

impl ParserRegistry {
    /// Build a registry from parsers in the given order.
    ///
    /// A later parser for an already registered type is ignored so that
    /// lookups and declaration order stay consistent.
    pub fn new(parsers: Vec<Box<dyn FormatParser>>) -> Self {
        let mut index = HashMap::new();
        let mut kept: Vec<Box<dyn FormatParser>> = Vec::with_capacity(parsers.len());

        for parser in parsers {
            let ty = parser.firewall_type();
            if index.contains_key(&ty) {
                tracing::warn!(format = %ty, "duplicate parser registration ignored");
                continue;
            }
            index.insert(ty, kept.len());
            kept.push(parser);
        }

        Self {
            parsers: kept,
            index,
        }
    }

    /// Build with every parser shipped in this crate.
    pub fn with_defaults() -> Self {
        Self::new(parsers::all_parsers())
    }

    /// Parser registered for `firewall_type`, if any.
    pub fn get(&self, firewall_type: FirewallType) -> Option<&dyn FormatParser> {
        self.index
            .get(&firewall_type)
            .map(|&i| self.parsers[i].as_ref())
    }

    /// Parsers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FormatParser> {
        self.parsers.iter().map(|p| p.as_ref())
    }

    /// Registered firewall types in declaration order.
    pub fn supported_types(&self) -> Vec<FirewallType> {
        self.iter().map(|p| p.firewall_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{FortiGateParser, WindowsDefenderParser};

    #[test]
    fn registry_with_defaults() {
        let reg = ParserRegistry::with_defaults();
        assert_eq!(reg.len(), 2);
        assert_eq!(
            reg.supported_types(),
            vec![FirewallType::WindowsDefender, FirewallType::FortiGate]
        );
    }

    #[test]
    fn lookup_by_type() {
        let reg = ParserRegistry::with_defaults();
        let parser = reg.get(FirewallType::FortiGate).unwrap();
        assert_eq!(parser.firewall_type(), FirewallType::FortiGate);
    }

    #[test]
    fn lookup_missing_type() {
        let reg = ParserRegistry::new(vec![Box::new(WindowsDefenderParser)]);
        assert!(reg.get(FirewallType::FortiGate).is_none());
    }

    #[test]
    fn declaration_order_is_preserved() {
        let reg = ParserRegistry::new(vec![Box::new(FortiGateParser), Box::new(WindowsDefenderParser)]);
        assert_eq!(
            reg.supported_types(),
            vec![FirewallType::FortiGate, FirewallType::WindowsDefender]
        );
    }

    #[test]
    fn duplicate_registration_ignored() {
        let reg = ParserRegistry::new(vec![
            Box::new(WindowsDefenderParser),
            Box::new(WindowsDefenderParser),
        ]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn empty_registry() {
        let reg = ParserRegistry::new(vec![]);
        assert!(reg.is_empty());
        assert!(reg.get(FirewallType::WindowsDefender).is_none());
    }
}
