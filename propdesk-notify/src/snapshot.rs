//! Poll snapshot and new-item detection
//!
//! The snapshot is the previous applied fetch result. Each poll cycle diffs
//! its fetch against it, then replaces it wholesale.

use crate::model::Notification;
use std::collections::HashSet;

/// Result of applying one poll cycle to the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// First successful fetch: snapshot seeded, nothing announced
    ColdStart,
    /// Snapshot replaced; contains the new unseen records in fetch order
    Applied(Vec<Notification>),
    /// A newer cycle was already applied; result discarded
    Stale { seq: u64, last_applied: u64 },
}

/// Previous-fetch baseline owned by the poller's center
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    notifications: Vec<Notification>,
    initialized: bool,
    last_applied: u64,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Whether a first fetch has been applied
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Sequence number of the last applied cycle (0 before any)
    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    /// Apply the fetch result of cycle `seq`.
    ///
    /// Cycle numbers start at 1 and increase per tick. A result from a cycle
    /// older than (or equal to) the last applied one is discarded so that a
    /// slow fetch can never roll the baseline back a generation.
    pub fn apply(&mut self, seq: u64, fetched: Vec<Notification>) -> CycleOutcome {
        if self.initialized && seq <= self.last_applied {
            return CycleOutcome::Stale {
                seq,
                last_applied: self.last_applied,
            };
        }

        let outcome = if self.initialized {
            CycleOutcome::Applied(new_unseen(&self.notifications, &fetched))
        } else {
            self.initialized = true;
            CycleOutcome::ColdStart
        };

        self.notifications = fetched;
        self.last_applied = seq;
        outcome
    }
}

/// Records in `fetched` whose id is absent from `previous` and that are
/// still unread, in fetch order.
pub fn new_unseen(previous: &[Notification], fetched: &[Notification]) -> Vec<Notification> {
    let seen: HashSet<&str> = previous.iter().map(|n| n.id.as_str()).collect();

    fetched
        .iter()
        .filter(|n| !seen.contains(n.id.as_str()) && n.is_unread())
        .cloned()
        .collect()
}
