//! Paper keyword errors.

use rostra_shared::AppError;
use thiserror::Error;

/// Errors resolving paper keywords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaperError {
    /// Unknown paper size keyword.
    #[error("Unknown paper size {0:?}")]
    UnknownSize(String),

    /// Unknown margin keyword.
    #[error("Unknown margin {0:?}")]
    UnknownMargin(String),
}

impl From<PaperError> for AppError {
    fn from(err: PaperError) -> Self {
        Self::Configuration(err.to_string())
    }
}
