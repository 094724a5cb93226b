//! Ledger error types.

use chrono::NaiveDate;
use rostra_shared::AppError;
use thiserror::Error;

/// Errors that can occur while preparing a reconciliation.
///
/// Reconciliation itself never fails: empty and unsorted input degrade to
/// zero balances. Only an impossible window is rejected, and that happens
/// when the window is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Window start is after its end.
    #[error("Invalid date window: start {start} is after end {end}")]
    InvalidWindow {
        /// Window start.
        start: NaiveDate,
        /// Window end.
        end: NaiveDate,
    },
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}
