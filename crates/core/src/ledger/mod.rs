//! Ledger reconciliation.
//!
//! This module implements point-in-time balances over two kinds of ledger:
//! - Self-balancing cash book entries (stored running balance)
//! - Derived per-entity statements (charges, payments and savings merged on read)
//! - Inclusive date windows
//! - Continuity audit and restatement of stored balances

pub mod balance;
pub mod entry;
pub mod error;
pub mod reconcile;
pub mod statement;
pub mod window;

#[cfg(test)]
mod reconcile_props;

pub use balance::{ContinuityBreak, RunningBalance, audit_continuity, restate_balances};
pub use entry::{CashBookEntry, Direction, LineSource, StatementLine};
pub use error::LedgerError;
pub use reconcile::{
    Reconciliation, merge_statement_sources, reconcile_cash_book, reconcile_cash_book_verified,
    reconcile_statement,
};
pub use statement::student_statement;
pub use window::DateWindow;
