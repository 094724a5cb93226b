//! Ledger entry domain types.

use chrono::NaiveDateTime;
use rostra_shared::types::CashBookEntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money in; increases the balance.
    Credit,
    /// Money out; decreases the balance.
    Debit,
}

impl Direction {
    /// Applies the credit/debit sign to an amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

/// A self-balancing general cash book entry.
///
/// `running_balance` is written when the entry is recorded and is the
/// authoritative value for reads. The engine never rewrites it in place; see
/// [`super::balance`] for the continuity audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashBookEntry {
    /// Entry ID.
    pub id: CashBookEntryId,
    /// Time the movement happened.
    pub recorded_at: NaiveDateTime,
    /// Credit or debit.
    pub direction: Direction,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Category (e.g. "tuition", "utilities").
    pub category: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Balance after this entry, persisted at write time.
    pub running_balance: Decimal,
}

impl CashBookEntry {
    /// Returns the signed amount (positive for credit, negative for debit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.direction.signed(self.amount)
    }
}

/// Source stream a statement line was merged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSource {
    /// A billing charge.
    Charge,
    /// A payment.
    Payment,
    /// A savings deposit.
    Deposit,
    /// A savings withdrawal.
    Withdrawal,
}

/// One line of a derived per-entity statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Time of the movement (date-only sources use midnight).
    pub at: NaiveDateTime,
    /// Description shown on the statement.
    pub description: String,
    /// Debit amount (charges, withdrawals).
    pub debit: Decimal,
    /// Credit amount (payments, deposits).
    pub credit: Decimal,
    /// Balance after this line; zero until folded.
    pub balance: Decimal,
    /// Stream the line came from.
    pub source: LineSource,
}

impl StatementLine {
    /// Net effect on the balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.credit - self.debit
    }
}
