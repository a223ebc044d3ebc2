use crate::classify::Classifier;
use crate::ledger::IdleLedger;
use crate::model::{ItemRecord, Snapshot};
use tracing::debug;

/// Cross-cycle state of one monitoring run: the idle ledger and the last snapshot.
#[derive(Debug, Clone, Default)]
pub struct Monitor {
    classifier: Classifier,
    ledger: IdleLedger,
    previous: Snapshot,
}

impl Monitor {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            ledger: IdleLedger::new(),
            previous: Snapshot::empty(),
        }
    }

    /// Classifies `current` against the last cycle, then keeps it as the new baseline.
    pub fn observe(&mut self, current: Snapshot) -> Vec<ItemRecord> {
        let active = self
            .classifier
            .classify(&current, &self.previous, &mut self.ledger);
        debug!(
            seen = current.len(),
            active = active.len(),
            idle_tracked = self.ledger.len(),
            "cycle classified"
        );
        self.previous = current;
        active
    }

    pub fn ledger(&self) -> &IdleLedger {
        &self.ledger
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }
}
