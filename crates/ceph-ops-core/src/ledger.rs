use crate::model::{ItemId, Snapshot};
use std::collections::HashMap;

/// Per-item count of consecutive stalled cycles.
///
/// Working memory for one run only. Entries exist solely for ids present in
/// the latest snapshot once [`IdleLedger::prune_absent`] has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdleLedger {
    counts: HashMap<ItemId, u32>,
}

impl IdleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ItemId) -> Option<u32> {
        self.counts.get(id).copied()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.counts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.counts.keys()
    }

    /// Drops every entry whose item is gone from `current`. Returns how many were dropped.
    pub fn prune_absent(&mut self, current: &Snapshot) -> usize {
        let before = self.counts.len();
        self.counts.retain(|id, _| current.contains(id));
        before - self.counts.len()
    }

    /// Forgets an item that made progress again.
    pub fn clear_entry(&mut self, id: &ItemId) -> bool {
        self.counts.remove(id).is_some()
    }

    /// Opens an entry at zero if needed and returns the current count.
    pub fn record_stall(&mut self, id: &ItemId) -> u32 {
        *self.counts.entry(id.clone()).or_insert(0)
    }

    pub fn bump(&mut self, id: &ItemId) {
        if let Some(count) = self.counts.get_mut(id) {
            *count = count.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemRecord;

    #[test]
    fn stall_opens_entry_at_zero_and_bump_increments() {
        let mut ledger = IdleLedger::new();
        let id = ItemId::from("1.0");
        assert_eq!(ledger.record_stall(&id), 0);
        ledger.bump(&id);
        assert_eq!(ledger.record_stall(&id), 1);
        assert_eq!(ledger.get(&id), Some(1));
    }

    #[test]
    fn bump_ignores_untracked_ids() {
        let mut ledger = IdleLedger::new();
        ledger.bump(&ItemId::from("9.9"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn prune_drops_ids_missing_from_snapshot() {
        let mut ledger = IdleLedger::new();
        ledger.record_stall(&ItemId::from("1.0"));
        ledger.record_stall(&ItemId::from("1.1"));
        let current: Snapshot = std::iter::once(ItemRecord::new("1.1", 0, 10)).collect();

        assert_eq!(ledger.prune_absent(&current), 1);
        assert!(!ledger.contains(&ItemId::from("1.0")));
        assert!(ledger.contains(&ItemId::from("1.1")));
    }
}
