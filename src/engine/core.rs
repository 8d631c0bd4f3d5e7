// src/engine/core.rs

//! Pure change-decision state.
//!
//! No Tokio, channels or processes here; the async shell in
//! [`runtime`](super::runtime) feeds fingerprints in and acts on the
//! returned [`Decision`].

use crate::types::Fingerprint;

/// What the orchestrator should do with a freshly computed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Unchanged,
    Changed {
        previous: Fingerprint,
        current: Fingerprint,
    },
}

/// Holds the last known fingerprint. History is not retained.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    last: Fingerprint,
}

impl ChangeTracker {
    pub fn new(baseline: Fingerprint) -> Self {
        Self { last: baseline }
    }

    pub fn current(&self) -> &Fingerprint {
        &self.last
    }

    /// Compare `next` with the last known value, adopting it on mismatch.
    pub fn observe(&mut self, next: Fingerprint) -> Decision {
        if next == self.last {
            return Decision::Unchanged;
        }

        let previous = std::mem::replace(&mut self.last, next.clone());
        Decision::Changed {
            previous,
            current: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_fingerprint_is_unchanged() {
        let mut tracker = ChangeTracker::new(Fingerprint::new("f0"));
        assert_eq!(tracker.observe(Fingerprint::new("f0")), Decision::Unchanged);
        assert_eq!(tracker.current(), &Fingerprint::new("f0"));
    }

    #[test]
    fn mismatch_reports_change_and_adopts_new_value() {
        let mut tracker = ChangeTracker::new(Fingerprint::new("f0"));

        assert_eq!(
            tracker.observe(Fingerprint::new("f1")),
            Decision::Changed {
                previous: Fingerprint::new("f0"),
                current: Fingerprint::new("f1"),
            }
        );
        assert_eq!(tracker.observe(Fingerprint::new("f1")), Decision::Unchanged);
    }

    #[test]
    fn flip_back_is_a_change_again() {
        let mut tracker = ChangeTracker::new(Fingerprint::new("f0"));
        tracker.observe(Fingerprint::new("f1"));

        assert!(matches!(
            tracker.observe(Fingerprint::new("f0")),
            Decision::Changed { .. }
        ));
    }

    #[test]
    fn readable_dir_after_unreadable_baseline_is_a_change() {
        let mut tracker = ChangeTracker::new(Fingerprint::unreadable());
        assert!(matches!(
            tracker.observe(Fingerprint::new("f0")),
            Decision::Changed { .. }
        ));
    }
}
