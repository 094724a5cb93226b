//! Identifier generation error types.

use rostra_shared::AppError;
use thiserror::Error;

/// Errors that can occur while generating an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The candidate record lacks a field the active strategy needs.
    #[error("Candidate record is missing required field `{0}`")]
    MissingField(&'static str),

    /// The classification has no configured counter or code.
    #[error("No numbering counter configured for classification {0:?}")]
    UnconfiguredClassification(String),

    /// A numbering setting holds an unrecognised keyword.
    #[error("Unknown {setting} keyword {value:?}")]
    UnknownKeyword {
        /// The setting name.
        setting: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Manual year source selected without a configured year.
    #[error("Year source is manual but no manual year is configured")]
    ManualYearMissing,

    /// The scope counter kept moving underneath every reservation attempt.
    #[error("Counter for scope {scope} changed during {attempts} reservation attempts")]
    Conflict {
        /// Scope key that could not be reserved.
        scope: String,
        /// Attempts made before giving up.
        attempts: u32,
    },
}

impl IdentifierError {
    /// Returns the error code for host display.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::UnconfiguredClassification(_) => "UNCONFIGURED_CLASSIFICATION",
            Self::UnknownKeyword { .. } => "UNKNOWN_KEYWORD",
            Self::ManualYearMissing => "MANUAL_YEAR_MISSING",
            Self::Conflict { .. } => "SCOPE_CONFLICT",
        }
    }
}

impl From<IdentifierError> for AppError {
    fn from(err: IdentifierError) -> Self {
        match err {
            IdentifierError::MissingField(_) => Self::Validation(err.to_string()),
            IdentifierError::UnconfiguredClassification(_)
            | IdentifierError::UnknownKeyword { .. }
            | IdentifierError::ManualYearMissing => Self::Configuration(err.to_string()),
            IdentifierError::Conflict { .. } => Self::Conflict(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_validation() {
        let err = IdentifierError::MissingField("intake_date");
        assert_eq!(err.error_code(), "MISSING_FIELD");
        assert!(err.to_string().contains("intake_date"));

        let app: AppError = err.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
        assert!(app.is_blocking());
    }

    #[test]
    fn test_unconfigured_classification_is_configuration() {
        let app: AppError = IdentifierError::UnconfiguredClassification("9".to_string()).into();
        assert_eq!(app.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_conflict_is_retryable() {
        let app: AppError = IdentifierError::Conflict {
            scope: "7/2024".to_string(),
            attempts: 3,
        }
        .into();
        assert_eq!(app.error_code(), "CONFLICT");
        assert!(!app.is_blocking());
    }
}
