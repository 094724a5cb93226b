//! Composition error types.

use rostra_shared::AppError;
use thiserror::Error;

use crate::filter::BlockReason;

/// Errors that can occur while composing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The request does not meet its minimum selection.
    #[error("Report is not ready: {}", .0.message())]
    NotReady(BlockReason),

    /// The configured facility does not exist.
    #[error("Unknown facility {0:?}")]
    UnknownFacility(String),

    /// A score sheet subject does not exist.
    #[error("Unknown subject {0:?}")]
    UnknownSubject(String),

    /// The session cannot perform an action in its current state.
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        /// Current state.
        from: &'static str,
        /// Attempted action.
        action: &'static str,
    },

    /// The generation task did not complete.
    #[error("Generation task failed: {0}")]
    Dispatch(String),
}

impl ComposeError {
    /// Returns the error code for host display.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady(_) => "NOT_READY",
            Self::UnknownFacility(_) => "UNKNOWN_FACILITY",
            Self::UnknownSubject(_) => "UNKNOWN_SUBJECT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Dispatch(_) => "DISPATCH_FAILED",
        }
    }
}

impl From<ComposeError> for AppError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::NotReady(_) => Self::NotReady(err.to_string()),
            ComposeError::UnknownFacility(_) | ComposeError::UnknownSubject(_) => {
                Self::NotFound(err.to_string())
            }
            ComposeError::InvalidTransition { .. } | ComposeError::Dispatch(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
