//! Locally created pledges the server listing may not include yet.
//!
//! The fetched collection is never modified. Pending additions live beside it
//! and [`PendingPledges::merge`] combines both for display, deduplicated by
//! pledge id. A successful refetch reconciles the set: additions the server
//! now returns are dropped, the rest stay until a later refetch includes them.

use tracing::debug;

use crate::types::Pledge;

#[derive(Clone, Debug, Default)]
pub struct PendingPledges {
    items: Vec<Pledge>,
}

impl PendingPledges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a just-created pledge. A second addition with the same id
    /// replaces the first.
    pub fn add(&mut self, pledge: Pledge) {
        match self.items.iter_mut().find(|p| p.id == pledge.id) {
            Some(existing) => *existing = pledge,
            None => self.items.push(pledge),
        }
    }

    /// Fetched pledges first, then pending ones the server did not return.
    pub fn merge(&self, fetched: &[Pledge]) -> Vec<Pledge> {
        let mut merged = fetched.to_vec();
        merged.extend(
            self.items
                .iter()
                .filter(|p| !fetched.iter().any(|f| f.id == p.id))
                .cloned(),
        );
        merged
    }

    /// Called after a successful refetch. Returns how many additions the
    /// server now lists and were therefore dropped.
    pub fn reconcile(&mut self, fetched: &[Pledge]) -> usize {
        let before = self.items.len();
        self.items.retain(|p| !fetched.iter().any(|f| f.id == p.id));
        let settled = before - self.items.len();
        if settled > 0 {
            debug!("Reconciled {settled} pending pledge additions");
        }
        settled
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
