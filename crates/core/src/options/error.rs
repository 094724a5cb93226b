//! Option editing errors.

use rostra_shared::AppError;
use thiserror::Error;

use crate::catalog::ReportType;
use crate::ledger::LedgerError;
use crate::paper::PaperError;

/// Errors raised while editing report options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The date range is inverted.
    #[error(transparent)]
    Window(#[from] LedgerError),

    /// A paper or margin keyword is not in the table.
    #[error(transparent)]
    Paper(#[from] PaperError),

    /// The report type does not take an explicit selection.
    #[error("Report type {0} does not support entity selection")]
    SelectionNotSupported(ReportType),
}

impl From<OptionsError> for AppError {
    fn from(err: OptionsError) -> Self {
        match err {
            OptionsError::Window(e) => e.into(),
            OptionsError::Paper(e) => e.into(),
            OptionsError::SelectionNotSupported(_) => Self::Validation(err.to_string()),
        }
    }
}
