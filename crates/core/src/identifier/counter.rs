//! Monotonic per-scope counters with optimistic compare-and-swap.
//!
//! The counting strategy derives a sequence number from a point-in-time
//! snapshot, so two writers holding the same snapshot compute the same
//! number. The registry keeps the last issued number per scope key; a
//! reservation takes `max(snapshot, last + 1)` and only wins if the slot
//! still holds the value it read.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::error::IdentifierError;
use super::strategy::{ScopeKey, SequenceStrategy};
use crate::records::Student;

/// Default number of compare-and-swap attempts before reporting a conflict.
const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Last issued sequence number per scope.
#[derive(Debug)]
pub struct ScopeCounterRegistry {
    counters: DashMap<ScopeKey, u32>,
    max_attempts: u32,
}

impl Default for ScopeCounterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeCounterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates an empty registry with a custom retry limit.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            counters: DashMap::new(),
            max_attempts,
        }
    }

    /// Last issued number for a scope.
    #[must_use]
    pub fn current(&self, key: &ScopeKey) -> Option<u32> {
        self.counters.get(key).map(|slot| *slot)
    }

    /// Sets the counter to `new` only if it still holds `expected`.
    ///
    /// `expected = None` means the scope has never been reserved.
    pub fn compare_and_swap(&self, key: &ScopeKey, expected: Option<u32>, new: u32) -> bool {
        match self.counters.entry(key.clone()) {
            Entry::Occupied(mut slot) => {
                if Some(*slot.get()) == expected {
                    *slot.get_mut() = new;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(slot) => {
                if expected.is_none() {
                    slot.insert(new);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Reserves the next number in a scope, never lower than `floor`.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Conflict` if every attempt lost its race.
    pub fn reserve(&self, key: &ScopeKey, floor: u32) -> Result<u32, IdentifierError> {
        for attempt in 1..=self.max_attempts {
            let observed = self.current(key);
            let next = observed.map_or(floor, |last| floor.max(last.saturating_add(1)));

            if self.compare_and_swap(key, observed, next) {
                return Ok(next);
            }
            debug!(scope = %key, attempt, "Scope counter moved; retrying reservation");
        }

        Err(IdentifierError::Conflict {
            scope: key.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Generates and reserves an identifier in one step.
    ///
    /// The strategy's snapshot-derived number is the floor; concurrent callers
    /// with stale snapshots receive distinct numbers.
    ///
    /// # Errors
    ///
    /// Propagates strategy errors and `IdentifierError::Conflict`.
    pub fn reserve_identifier(
        &self,
        strategy: &dyn SequenceStrategy,
        existing: &[Student],
        candidate: &Student,
    ) -> Result<String, IdentifierError> {
        let key = strategy.scope_key(candidate)?;
        let floor = strategy.next_sequence(existing, candidate)?;
        let sequence = self.reserve(&key, floor)?;
        strategy.render(candidate, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_cas_on_vacant_and_occupied() {
        let registry = ScopeCounterRegistry::new();
        let key = ScopeKey::new("7/2024");

        assert!(!registry.compare_and_swap(&key, Some(1), 2));
        assert!(registry.compare_and_swap(&key, None, 1));
        assert!(!registry.compare_and_swap(&key, None, 5));
        assert!(registry.compare_and_swap(&key, Some(1), 2));
        assert_eq!(registry.current(&key), Some(2));
    }

    #[test]
    fn test_reserve_respects_floor_and_last() {
        let registry = ScopeCounterRegistry::new();
        let key = ScopeKey::new("PS2024");

        assert_eq!(registry.reserve(&key, 6).unwrap(), 6);
        // Stale snapshot still says 6.
        assert_eq!(registry.reserve(&key, 6).unwrap(), 7);
        // Snapshot ahead of the counter wins.
        assert_eq!(registry.reserve(&key, 20).unwrap(), 20);
    }

    #[test]
    fn test_zero_attempts_reports_conflict() {
        let registry = ScopeCounterRegistry::with_max_attempts(0);
        let err = registry.reserve(&ScopeKey::new("k"), 1).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::Conflict {
                scope: "k".to_string(),
                attempts: 0
            }
        );
    }

    #[test]
    fn test_concurrent_reservations_are_distinct() {
        let registry = ScopeCounterRegistry::new();
        let key = ScopeKey::new("7/2024");

        let issued: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..25)
                            .map(|_| registry.reserve(&key, 1).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let distinct: BTreeSet<u32> = issued.iter().copied().collect();
        assert_eq!(distinct.len(), 100);
        assert_eq!(distinct.first(), Some(&1));
        assert_eq!(distinct.last(), Some(&100));
    }
}
