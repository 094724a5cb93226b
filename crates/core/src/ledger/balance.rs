//! Running balance folding and cash book continuity audit.
//!
//! A self-balancing cash book stores each entry's post-transaction balance
//! at write time. Back-dated inserts, edits and deletes leave every later
//! stored balance stale, and nothing on the write path notices. The audit
//! here detects the first break lazily on read and restates the tail from a
//! recomputed fold; the persisted values are left untouched so the host can
//! rewrite them in its own transaction.

use rostra_shared::types::CashBookEntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entry::CashBookEntry;

/// Running balance at one position of a fold.
///
/// - `position`: 1-based, monotonically increasing
/// - `previous_balance`: balance before this entry
/// - `current_balance`: balance after this entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position in the fold (1-based).
    pub position: usize,
    /// Balance before this entry.
    pub previous_balance: Decimal,
    /// Balance after this entry.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a fold from an opening balance.
    #[must_use]
    pub fn opening(balance: Decimal) -> Self {
        Self {
            position: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Folds the next signed amount.
    ///
    /// - current_balance[N] = current_balance[N-1] + change
    /// - previous_balance[N] = current_balance[N-1]
    #[must_use]
    pub fn next_entry(&self, change: Decimal) -> Self {
        Self {
            position: self.position + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance + change,
        }
    }
}

/// A stored balance that does not follow from its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuityBreak {
    /// Index in chronological order.
    pub index: usize,
    /// Offending entry.
    pub entry_id: CashBookEntryId,
    /// Balance implied by the previous stored balance and this entry's amount.
    pub expected: Decimal,
    /// Balance actually stored.
    pub recorded: Decimal,
}

/// Sorts entries chronologically; entries sharing a timestamp keep input order.
#[must_use]
pub fn chronological(entries: &[CashBookEntry]) -> Vec<&CashBookEntry> {
    let mut sorted: Vec<&CashBookEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.recorded_at);
    sorted
}

/// Checks `running_balance[i] == running_balance[i-1] + signed_amount[i]` for every i > 0.
///
/// The first entry anchors the chain and is never reported.
#[must_use]
pub fn audit_continuity(entries: &[CashBookEntry]) -> Vec<ContinuityBreak> {
    let sorted = chronological(entries);

    sorted
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let expected = pair[0].running_balance + pair[1].signed_amount();
            (expected != pair[1].running_balance).then(|| ContinuityBreak {
                index: i + 1,
                entry_id: pair[1].id,
                expected,
                recorded: pair[1].running_balance,
            })
        })
        .collect()
}

/// Recomputes stored balances from `from_index` onward (chronological order).
///
/// Entries before `from_index` keep their stored balance; the fold resumes
/// from the balance stored at `from_index - 1`, or from zero when restating
/// the whole book.
#[must_use]
pub fn restate_balances(entries: &[CashBookEntry], from_index: usize) -> Vec<CashBookEntry> {
    let sorted = chronological(entries);
    let anchor = from_index
        .checked_sub(1)
        .and_then(|i| sorted.get(i))
        .map_or(Decimal::ZERO, |entry| entry.running_balance);

    let mut running = RunningBalance::opening(anchor);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut restated = entry.clone();
            if i >= from_index {
                running = running.next_entry(entry.signed_amount());
                restated.running_balance = running.current_balance;
            }
            restated
        })
        .collect()
}

/// Audits the book and, if it is broken, returns a restated copy.
///
/// Returns `None` when every stored balance is continuous.
#[must_use]
pub fn repair_if_broken(
    entries: &[CashBookEntry],
) -> Option<(Vec<CashBookEntry>, Vec<ContinuityBreak>)> {
    let breaks = audit_continuity(entries);
    let first = breaks.first()?;

    warn!(
        breaks = breaks.len(),
        first_index = first.index,
        expected = %first.expected,
        recorded = %first.recorded,
        "Cash book running balances are discontinuous; restating from first break"
    );

    let restated = restate_balances(entries, first.index);
    Some((restated, breaks))
}
