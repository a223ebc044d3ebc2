use crate::ledger::IdleLedger;
use crate::model::{ItemRecord, Snapshot, VisualState};
use tracing::trace;

/// Stalled cycles an item stays on screen before it is treated as stopped.
pub const DEFAULT_IDLE_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    idle_threshold: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_THRESHOLD)
    }
}

impl Classifier {
    pub fn new(idle_threshold: u32) -> Self {
        Self { idle_threshold }
    }

    /// Tags every live item in `current` and returns them ordered by id.
    ///
    /// Only a strict increase of `progress_counter` counts as progress; a
    /// counter that went backwards is a stall. Items stalled for
    /// `idle_threshold` cycles are left out but keep their ledger entry
    /// until they vanish from the source.
    pub fn classify(
        &self,
        current: &Snapshot,
        previous: &Snapshot,
        ledger: &mut IdleLedger,
    ) -> Vec<ItemRecord> {
        let pruned = ledger.prune_absent(current);
        if pruned > 0 {
            trace!(pruned, "dropped idle entries for vanished items");
        }

        let mut active = Vec::with_capacity(current.len());
        for item in current.iter() {
            let state = match previous.get(&item.id) {
                None => VisualState::Rising,
                Some(prior) if item.progress_counter > prior.progress_counter => {
                    ledger.clear_entry(&item.id);
                    VisualState::Rising
                }
                Some(_) => {
                    let idle_cycles = ledger.record_stall(&item.id);
                    if idle_cycles >= self.idle_threshold {
                        trace!(id = %item.id, idle_cycles, "item went idle");
                        continue;
                    }
                    ledger.bump(&item.id);
                    VisualState::Idle
                }
            };

            let mut record = item.clone();
            record.visual_state = state;
            active.push(record);
        }

        active.sort_by(|a, b| a.id.cmp(&b.id));
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;

    fn snapshot(items: &[(&str, u64)]) -> Snapshot {
        items
            .iter()
            .map(|(id, progress)| ItemRecord::new(*id, *progress, 100))
            .collect()
    }

    fn states(items: &[ItemRecord]) -> Vec<(&str, VisualState)> {
        items
            .iter()
            .map(|item| (item.id.as_str(), item.visual_state))
            .collect()
    }

    #[test]
    fn new_items_rise_without_ledger_entry() {
        let mut ledger = IdleLedger::new();
        let out = Classifier::default().classify(
            &snapshot(&[("1.0", 3)]),
            &Snapshot::empty(),
            &mut ledger,
        );
        assert_eq!(states(&out), vec![("1.0", VisualState::Rising)]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn progress_clears_previous_idle_entry() {
        let mut ledger = IdleLedger::new();
        let classifier = Classifier::default();
        let prev = snapshot(&[("1.0", 3)]);
        classifier.classify(&prev, &prev, &mut ledger);
        assert_eq!(ledger.get(&ItemId::from("1.0")), Some(1));

        let out = classifier.classify(&snapshot(&[("1.0", 4)]), &prev, &mut ledger);
        assert_eq!(states(&out), vec![("1.0", VisualState::Rising)]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn counter_reset_counts_as_stall() {
        let mut ledger = IdleLedger::new();
        let out = Classifier::default().classify(
            &snapshot(&[("1.0", 2)]),
            &snapshot(&[("1.0", 50)]),
            &mut ledger,
        );
        assert_eq!(states(&out), vec![("1.0", VisualState::Idle)]);
        assert_eq!(ledger.get(&ItemId::from("1.0")), Some(1));
    }

    #[test]
    fn stalled_item_drops_out_once_threshold_reached() {
        let mut ledger = IdleLedger::new();
        let classifier = Classifier::new(1);
        let snap = snapshot(&[("1.0", 7)]);

        let first = classifier.classify(&snap, &snap, &mut ledger);
        assert_eq!(states(&first), vec![("1.0", VisualState::Idle)]);

        let second = classifier.classify(&snap, &snap, &mut ledger);
        assert!(second.is_empty());
        assert_eq!(ledger.get(&ItemId::from("1.0")), Some(1));
    }

    #[test]
    fn zero_threshold_hides_first_stall() {
        let mut ledger = IdleLedger::new();
        let snap = snapshot(&[("1.0", 7)]);
        let out = Classifier::new(0).classify(&snap, &snap, &mut ledger);
        assert!(out.is_empty());
        assert_eq!(ledger.get(&ItemId::from("1.0")), Some(0));
    }

    #[test]
    fn vanished_items_are_pruned_before_classification() {
        let mut ledger = IdleLedger::new();
        let classifier = Classifier::default();
        let prev = snapshot(&[("1.0", 1), ("1.1", 1)]);
        classifier.classify(&prev, &prev, &mut ledger);
        assert_eq!(ledger.len(), 2);

        let current = snapshot(&[("1.1", 1)]);
        classifier.classify(&current, &prev, &mut ledger);
        let tracked: Vec<&str> = ledger.ids().map(ItemId::as_str).collect();
        assert_eq!(tracked, vec!["1.1"]);
    }
}
