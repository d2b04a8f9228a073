//! Rescue progress: how many ducklings made it home out of the total.
use bevy::prelude::*;
use log::warn;
use thiserror::Error;

/// Rejected tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// The total must be positive.
    #[error("duckling total must be positive")]
    ZeroTotal,
    /// The total can only be set once.
    #[error("duckling total already set to {current}")]
    TotalAlreadySet {
        /// The total that was already set.
        current: u32,
    },
}

/// Count of rescued ducklings against a fixed total.
///
/// `found` never exceeds `total` and never decreases except through
/// [`ProgressTracker::reset`].
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    found: u32,
    total: u32,
}

impl ProgressTracker {
    /// Creates a tracker with its total already set.
    ///
    /// # Errors
    /// Returns [`ProgressError::ZeroTotal`] when `total` is zero.
    pub fn with_total(total: u32) -> Result<Self, ProgressError> {
        let mut tracker = Self::default();
        tracker.set_total(total)?;
        Ok(tracker)
    }

    /// Sets the total once.
    ///
    /// A rejected call leaves the tracker untouched.
    ///
    /// # Errors
    /// Returns [`ProgressError::ZeroTotal`] for a zero total and
    /// [`ProgressError::TotalAlreadySet`] if a total is already in place.
    pub fn set_total(&mut self, total: u32) -> Result<(), ProgressError> {
        if self.total > 0 {
            return Err(ProgressError::TotalAlreadySet {
                current: self.total,
            });
        }
        if total == 0 {
            return Err(ProgressError::ZeroTotal);
        }
        self.total = total;
        Ok(())
    }

    /// Counts one rescued duckling.
    ///
    /// Returns `false`, leaving the count unchanged, when every duckling is
    /// already accounted for or no total has been set.
    pub fn record_found(&mut self) -> bool {
        if self.found >= self.total {
            warn!(
                "ignoring rescue beyond the total ({}/{})",
                self.found, self.total
            );
            return false;
        }
        self.found += 1;
        true
    }

    /// Ducklings rescued so far.
    #[must_use]
    pub const fn found(&self) -> u32 {
        self.found
    }

    /// Ducklings in the game.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Ducklings still out in the world.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.found)
    }

    /// Whether every duckling is home. Always `false` without a total.
    #[must_use]
    pub const fn all_found(&self) -> bool {
        self.total > 0 && self.found == self.total
    }

    /// Clears the rescue count, keeping the total.
    pub fn reset(&mut self) {
        self.found = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn zero_total_is_rejected_without_side_effects() {
        let mut tracker = ProgressTracker::default();
        assert_eq!(tracker.set_total(0), Err(ProgressError::ZeroTotal));
        assert_eq!(tracker, ProgressTracker::default());
        assert!(!tracker.all_found());
    }

    #[test]
    fn total_is_set_once() {
        let mut tracker = ProgressTracker::with_total(3).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            tracker.set_total(5),
            Err(ProgressError::TotalAlreadySet { current: 3 })
        );
        assert_eq!(tracker.total(), 3);
    }

    #[rstest]
    #[case::none_found(0, false)]
    #[case::some_found(2, false)]
    #[case::all_found(3, true)]
    #[case::overflow_attempts(7, true)]
    fn found_is_monotonic_and_bounded(#[case] rescues: u32, #[case] complete: bool) {
        let mut tracker = ProgressTracker::with_total(3).unwrap_or_else(|e| panic!("{e}"));
        let mut previous = tracker.found();
        for _ in 0..rescues {
            tracker.record_found();
            assert!(tracker.found() >= previous);
            assert!(tracker.found() <= tracker.total());
            previous = tracker.found();
        }
        assert_eq!(tracker.all_found(), complete);
        assert_eq!(tracker.remaining(), 3 - tracker.found());
    }

    #[test]
    fn rescues_without_total_are_ignored() {
        let mut tracker = ProgressTracker::default();
        assert!(!tracker.record_found());
        assert_eq!(tracker.found(), 0);
    }

    #[test]
    fn reset_keeps_total() {
        let mut tracker = ProgressTracker::with_total(2).unwrap_or_else(|e| panic!("{e}"));
        tracker.record_found();
        tracker.reset();
        assert_eq!((tracker.found(), tracker.total()), (0, 2));
    }
}
