//! Aspect ledger: named narrative-tag slots plus the refresh counter.

use std::collections::BTreeMap;

/// Per-actor aspect capability. Slots ("concept", "trouble", "1"..) hold
/// one tag string each; setting an occupied slot overwrites it. Refresh is
/// tracked as invocation currency but nothing spends it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectLedger {
    refresh: i64,
    aspects: BTreeMap<String, String>,
}

impl AspectLedger {
    pub fn new(refresh: i64) -> Self {
        Self {
            refresh,
            aspects: BTreeMap::new(),
        }
    }

    pub fn refresh(&self) -> i64 {
        self.refresh
    }

    /// Upsert; overwrites whatever the slot held.
    pub fn set(&mut self, slot: impl Into<String>, text: impl Into<String>) {
        self.aspects.insert(slot.into(), text.into());
    }

    /// All (slot, text) pairs whose text contains `query`,
    /// case-insensitively.
    pub fn find(&self, query: &str) -> Vec<(&str, &str)> {
        let needle = query.trim().to_lowercase();
        self.aspects
            .iter()
            .filter(|(_, text)| text.to_lowercase().contains(&needle))
            .map(|(slot, text)| (slot.as_str(), text.as_str()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aspects
            .iter()
            .map(|(slot, text)| (slot.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }
}
