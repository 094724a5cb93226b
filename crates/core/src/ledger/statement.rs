//! Per-entity statement assembly from shared collections.

use rostra_shared::types::StudentId;

use super::entry::StatementLine;
use super::reconcile::{Reconciliation, reconcile_statement};
use super::window::DateWindow;
use crate::records::SourceCollections;

/// Reconciles one student's charges, payments and savings over a window.
///
/// Balances start from an implicit zero at the student's first movement.
#[must_use]
pub fn student_statement(
    sources: &SourceCollections,
    student_id: StudentId,
    window: &DateWindow,
) -> Reconciliation<StatementLine> {
    reconcile_statement(
        sources
            .charges
            .iter()
            .filter(|charge| charge.student_id == student_id),
        sources
            .payments
            .iter()
            .filter(|payment| payment.student_id == student_id),
        sources
            .savings
            .iter()
            .filter(|tx| tx.student_id == student_id),
        window,
    )
}
