//! Point-in-time reconciliation of ledgers against a date window.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::balance::{ContinuityBreak, RunningBalance, chronological, repair_if_broken};
use super::entry::{CashBookEntry, LineSource, StatementLine};
use super::window::DateWindow;
use crate::records::{Charge, Payment, SavingsKind, SavingsTransaction};

/// Opening balance, closing balance and the in-window series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation<T> {
    /// Balance carried into the window.
    pub opening: Decimal,
    /// Balance at the end of the window.
    pub closing: Decimal,
    /// Entries inside the window, ascending by time.
    pub series: Vec<T>,
}

impl<T> Reconciliation<T> {
    /// An empty reconciliation carrying `opening` straight through.
    #[must_use]
    pub fn empty(opening: Decimal) -> Self {
        Self {
            opening,
            closing: opening,
            series: Vec::new(),
        }
    }
}

impl Reconciliation<StatementLine> {
    /// Sum of debits inside the window.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.series.iter().map(|line| line.debit).sum()
    }

    /// Sum of credits inside the window.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.series.iter().map(|line| line.credit).sum()
    }
}

/// Reconciles a self-balancing cash book.
///
/// - `opening`: stored balance of the last entry strictly before the window (0 if none)
/// - `series`: entries inside the window with their stored balances
/// - `closing`: stored balance of the last in-window entry, else `opening`
///
/// Stored balances are trusted as-is. Use [`reconcile_cash_book_verified`]
/// to audit them first.
#[must_use]
pub fn reconcile_cash_book(
    entries: &[CashBookEntry],
    window: &DateWindow,
) -> Reconciliation<CashBookEntry> {
    let sorted = chronological(entries);

    let opening = sorted
        .iter()
        .take_while(|entry| window.precedes(entry.recorded_at))
        .last()
        .map_or(Decimal::ZERO, |entry| entry.running_balance);

    let series: Vec<CashBookEntry> = sorted
        .into_iter()
        .filter(|entry| window.contains(entry.recorded_at))
        .cloned()
        .collect();

    let closing = series
        .last()
        .map_or(opening, |entry| entry.running_balance);

    debug!(
        window_start = %window.start(),
        window_end = %window.end(),
        entries = series.len(),
        %opening,
        %closing,
        "Reconciled cash book"
    );

    Reconciliation {
        opening,
        closing,
        series,
    }
}

/// Reconciles a cash book after auditing stored balances.
///
/// When the audit finds a break, the reconciliation is computed over the
/// restated balances and the breaks are returned alongside it.
#[must_use]
pub fn reconcile_cash_book_verified(
    entries: &[CashBookEntry],
    window: &DateWindow,
) -> (Reconciliation<CashBookEntry>, Vec<ContinuityBreak>) {
    match repair_if_broken(entries) {
        Some((restated, breaks)) => (reconcile_cash_book(&restated, window), breaks),
        None => (reconcile_cash_book(entries, window), Vec::new()),
    }
}

/// Merges charges, payments and savings into untagged statement lines.
///
/// Charges and withdrawals are debits; payments and deposits are credits.
/// Lines are returned in stream order (charges, payments, savings).
pub fn merge_statement_sources<'a>(
    charges: impl IntoIterator<Item = &'a Charge>,
    payments: impl IntoIterator<Item = &'a Payment>,
    savings: impl IntoIterator<Item = &'a SavingsTransaction>,
) -> Vec<StatementLine> {
    let charges = charges.into_iter().map(|charge| StatementLine {
        at: charge.issued_on.and_time(chrono::NaiveTime::MIN),
        description: charge.description.clone(),
        debit: charge.amount,
        credit: Decimal::ZERO,
        balance: Decimal::ZERO,
        source: LineSource::Charge,
    });

    let payments = payments.into_iter().map(|payment| StatementLine {
        at: payment.paid_at,
        description: payment
            .note
            .clone()
            .unwrap_or_else(|| "Payment".to_string()),
        debit: Decimal::ZERO,
        credit: payment.amount,
        balance: Decimal::ZERO,
        source: LineSource::Payment,
    });

    let savings = savings.into_iter().map(|tx| {
        let (debit, credit, source, label) = match tx.kind {
            SavingsKind::Deposit => (Decimal::ZERO, tx.amount, LineSource::Deposit, "Deposit"),
            SavingsKind::Withdrawal => {
                (tx.amount, Decimal::ZERO, LineSource::Withdrawal, "Withdrawal")
            }
        };
        StatementLine {
            at: tx.recorded_at,
            description: tx.note.clone().unwrap_or_else(|| label.to_string()),
            debit,
            credit,
            balance: Decimal::ZERO,
            source,
        }
    });

    charges.chain(payments).chain(savings).collect()
}

/// Reconciles a derived statement from its three source streams.
///
/// - `opening`: sum of `credit - debit` over lines strictly before the window
/// - `series`: in-window lines ascending by time, each carrying the folded balance
/// - `closing`: balance of the last folded line, else `opening`
///
/// Streams need not be sorted. Lines sharing a timestamp keep stream order.
#[must_use]
pub fn reconcile_statement<'a>(
    charges: impl IntoIterator<Item = &'a Charge>,
    payments: impl IntoIterator<Item = &'a Payment>,
    savings: impl IntoIterator<Item = &'a SavingsTransaction>,
    window: &DateWindow,
) -> Reconciliation<StatementLine> {
    let merged = merge_statement_sources(charges, payments, savings);

    let opening: Decimal = merged
        .iter()
        .filter(|line| window.precedes(line.at))
        .map(StatementLine::signed_amount)
        .sum();

    let mut series: Vec<StatementLine> = merged
        .into_iter()
        .filter(|line| window.contains(line.at))
        .collect();
    series.sort_by_key(|line| line.at);

    let mut running = RunningBalance::opening(opening);
    for line in &mut series {
        running = running.next_entry(line.signed_amount());
        line.balance = running.current_balance;
    }

    Reconciliation {
        opening,
        closing: running.current_balance,
        series,
    }
}
