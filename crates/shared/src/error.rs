//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Host-facing error umbrella.
///
/// Every engine error converts into one of these so a host application can
/// show a single blocking message without matching on module-specific enums.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required source field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration references something that is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A referenced record or collection does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request does not meet its minimum selection yet.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Concurrent update lost a compare-and-swap race.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal failure (e.g. a generation task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code shown to hosts.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotReady(_) => "NOT_READY",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the host must stop the current action and show the message.
    ///
    /// Conflicts are retryable: the caller re-reads the counter and tries again.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        !matches!(self, Self::Conflict(_))
    }
}
