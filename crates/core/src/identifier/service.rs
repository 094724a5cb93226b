//! Identifier generation entry point.

use tracing::{debug, warn};

use super::error::IdentifierError;
use super::policy::IdentifierScope;
use crate::records::Student;

/// Identifier generator.
pub struct IdentifierGenerator;

impl IdentifierGenerator {
    /// Generates an identifier for `candidate` against the loaded record set.
    ///
    /// The result is not reserved anywhere; the host must re-check uniqueness
    /// before persisting it. See [`super::ScopeCounterRegistry`] for
    /// arbitration between writers sharing a process.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the candidate lacks the intake date, birth date or
    ///   classification the active strategy needs
    /// - `UnconfiguredClassification` if the classification has no counter
    pub fn generate(
        existing: &[Student],
        candidate: &Student,
        scope: &IdentifierScope,
    ) -> Result<String, IdentifierError> {
        let strategy = scope.strategy();

        match strategy.generate(existing, candidate) {
            Ok(identifier) => {
                debug!(
                    strategy = strategy.name(),
                    student_id = %candidate.id,
                    %identifier,
                    "Generated identifier"
                );
                Ok(identifier)
            }
            Err(e) => {
                warn!(
                    strategy = strategy.name(),
                    student_id = %candidate.id,
                    error = %e,
                    "Identifier generation failed"
                );
                Err(e)
            }
        }
    }
}
