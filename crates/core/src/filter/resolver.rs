//! Resolves a report request to its working set.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use rostra_shared::types::StudentId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::hierarchy::ClassificationHierarchy;
use crate::catalog::{DataScope, ReportType};
use crate::composer::ComposeError;
use crate::ledger::CashBookEntry;
use crate::options::{ReportRequest, SelectionMode};
use crate::records::{Facility, LibraryLoan, SourceCollections, Student};

/// Label for students without a classroom group.
pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    /// Joined from another institution.
    In,
    /// Left for another institution.
    Out,
}

/// A transfer keyed by its event date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Student transferred.
    pub student_id: StudentId,
    /// Student name.
    pub name: String,
    /// In or out.
    pub direction: TransferDirection,
    /// Event date.
    pub date: NaiveDate,
    /// Counterpart institution.
    pub institution: Option<String>,
}

/// Why a request cannot be generated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// A score sheet needs at least one subject.
    NoSubjects,
    /// Explicit selection mode with nothing selected.
    NoEntitiesSelected,
    /// The report needs a date window.
    MissingWindow,
    /// A facility roster needs a facility.
    NoFacility,
}

impl BlockReason {
    /// Message for the host's blocking banner.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoSubjects => "choose at least one subject",
            Self::NoEntitiesSelected => "select at least one student",
            Self::MissingWindow => "choose a date range",
            Self::NoFacility => "choose a facility",
        }
    }
}

/// Whether a request meets its minimum selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum Readiness {
    /// Generation may proceed.
    Ready,
    /// Generation is blocked.
    Blocked(BlockReason),
}

impl Readiness {
    /// Returns true if generation may proceed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// The data a report is composed from.
#[derive(Debug, Clone)]
pub enum WorkingSet<'a> {
    /// Students, sorted by group, then name, then ID.
    Students(Vec<&'a Student>),
    /// The full cash book; the reconciler needs entries before the window.
    CashBook(&'a [CashBookEntry]),
    /// Transfer events inside the window, by date then name.
    Transfers(Vec<TransferEvent>),
    /// Residents of one facility.
    Facility(&'a Facility, Vec<&'a Student>),
    /// Loans borrowed inside the window, by date then title.
    Loans(Vec<&'a LibraryLoan>),
}

impl WorkingSet<'_> {
    /// Number of qualifying items.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Students(students) | Self::Facility(_, students) => students.len(),
            Self::CashBook(entries) => entries.len(),
            Self::Transfers(events) => events.len(),
            Self::Loans(loans) => loans.len(),
        }
    }

    /// Returns true if nothing qualified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Roster ordering: group, then case-insensitive name, then ID.
#[must_use]
pub fn roster_order(a: &Student, b: &Student) -> Ordering {
    a.group
        .cmp(&b.group)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Splits students into per-group partitions, dropping empty ones.
///
/// Groups known to the hierarchy come first in hierarchy order, then any
/// other groups alphabetically, then students without a group. A group name
/// listed under several grades forms a single partition.
#[must_use]
pub fn partition_by_group<'a>(
    students: &[&'a Student],
    hierarchy: &ClassificationHierarchy,
) -> Vec<(String, Vec<&'a Student>)> {
    let mut seen = HashSet::new();
    let mut keys: Vec<&str> = hierarchy
        .all_groups()
        .filter(|group| seen.insert(*group))
        .collect();
    let mut extra: Vec<&str> = students
        .iter()
        .filter_map(|student| student.group.as_deref())
        .filter(|group| !keys.contains(group))
        .collect();
    extra.sort_unstable();
    extra.dedup();
    keys.extend(extra);

    let mut partitions: Vec<(String, Vec<&'a Student>)> = keys
        .into_iter()
        .map(|key| {
            let members = students
                .iter()
                .filter(|student| student.group.as_deref() == Some(key))
                .copied()
                .collect();
            (key.to_string(), members)
        })
        .collect();

    let unassigned: Vec<&'a Student> = students
        .iter()
        .filter(|student| student.group.is_none())
        .copied()
        .collect();
    partitions.push((UNASSIGNED_GROUP.to_string(), unassigned));

    partitions.retain(|(_, members)| !members.is_empty());
    partitions
}

/// Filter resolver.
pub struct FilterResolver;

impl FilterResolver {
    /// Checks the request's minimum generability condition without resolving data.
    #[must_use]
    pub fn readiness(request: &ReportRequest) -> Readiness {
        let report_type = request.report_type;

        if report_type == ReportType::ScoreSheet && request.per_type.subjects.is_empty() {
            return Readiness::Blocked(BlockReason::NoSubjects);
        }
        if report_type.supports_selection()
            && matches!(&request.per_type.selection, SelectionMode::Selected(ids) if ids.is_empty())
        {
            return Readiness::Blocked(BlockReason::NoEntitiesSelected);
        }
        if report_type.requires_window() && request.window.is_none() {
            return Readiness::Blocked(BlockReason::MissingWindow);
        }
        if report_type == ReportType::FacilityRoster && request.per_type.facility.is_none() {
            return Readiness::Blocked(BlockReason::NoFacility);
        }

        Readiness::Ready
    }

    /// Narrows the source collections to the request's working set.
    ///
    /// # Errors
    ///
    /// - `ComposeError::NotReady` if the request is blocked
    /// - `ComposeError::UnknownFacility` if the configured facility does not exist
    pub fn resolve<'a>(
        request: &ReportRequest,
        sources: &'a SourceCollections,
    ) -> Result<WorkingSet<'a>, ComposeError> {
        if let Readiness::Blocked(reason) = Self::readiness(request) {
            return Err(ComposeError::NotReady(reason));
        }

        let working = match request.report_type.data_scope() {
            DataScope::FilteredStudents => {
                WorkingSet::Students(Self::filtered_students(request, sources))
            }
            DataScope::Selection => WorkingSet::Students(Self::selected_students(request, sources)),
            DataScope::CashBook => WorkingSet::CashBook(&sources.cash_book),
            DataScope::TransferEvents => WorkingSet::Transfers(Self::transfers(request, sources)),
            DataScope::Facility => {
                let code = request.per_type.facility.as_deref().unwrap_or_default();
                let facility = sources
                    .facility(code)
                    .ok_or_else(|| ComposeError::UnknownFacility(code.to_string()))?;
                let mut residents: Vec<&Student> = sources
                    .students
                    .iter()
                    .filter(|student| student.facility.as_deref() == Some(code))
                    .collect();
                residents.sort_by(|a, b| roster_order(a, b));
                WorkingSet::Facility(facility, residents)
            }
            DataScope::Loans => {
                let mut loans: Vec<&LibraryLoan> = sources
                    .loans
                    .iter()
                    .filter(|loan| {
                        request
                            .window
                            .is_none_or(|window| window.contains_date(loan.borrowed_on))
                    })
                    .collect();
                loans.sort_by(|a, b| {
                    a.borrowed_on
                        .cmp(&b.borrowed_on)
                        .then_with(|| a.title.cmp(&b.title))
                });
                WorkingSet::Loans(loans)
            }
        };

        debug!(
            report_type = %request.report_type,
            items = working.len(),
            "Resolved working set"
        );
        Ok(working)
    }

    fn filtered_students<'a>(
        request: &ReportRequest,
        sources: &'a SourceCollections,
    ) -> Vec<&'a Student> {
        let filter = &request.filter;
        if !filter.is_consistent(&sources.hierarchy) {
            debug!(?filter, "Filter narrowing contradicts the hierarchy; nothing qualifies");
            return Vec::new();
        }

        let mut students: Vec<&Student> = sources
            .students
            .iter()
            .filter(|student| filter.matches(student, &sources.hierarchy))
            .collect();
        students.sort_by(|a, b| roster_order(a, b));
        students
    }

    fn selected_students<'a>(
        request: &ReportRequest,
        sources: &'a SourceCollections,
    ) -> Vec<&'a Student> {
        match &request.per_type.selection {
            SelectionMode::All => Self::filtered_students(request, sources),
            SelectionMode::Selected(ids) => {
                let mut students: Vec<&Student> = Vec::with_capacity(ids.len());
                for id in ids {
                    match sources.student(*id) {
                        Some(student) if !students.iter().any(|s| s.id == *id) => {
                            students.push(student);
                        }
                        Some(_) => {}
                        None => warn!(student_id = %id, "Selected student not found; skipping"),
                    }
                }
                students.sort_by(|a, b| roster_order(a, b));
                students
            }
        }
    }

    fn transfers(request: &ReportRequest, sources: &SourceCollections) -> Vec<TransferEvent> {
        let in_window = |date: NaiveDate| {
            request
                .window
                .is_none_or(|window| window.contains_date(date))
        };

        let mut events: Vec<TransferEvent> = sources
            .students
            .iter()
            .flat_map(|student| {
                let incoming = student
                    .transfer_in_date
                    .map(|date| (TransferDirection::In, date));
                let outgoing = student
                    .transfer_out_date
                    .map(|date| (TransferDirection::Out, date));
                incoming
                    .into_iter()
                    .chain(outgoing)
                    .map(|(direction, date)| TransferEvent {
                        student_id: student.id,
                        name: student.name.clone(),
                        direction,
                        date,
                        institution: student.transfer_institution.clone(),
                    })
            })
            .filter(|event| in_window(event.date))
            .collect();

        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        events
    }
}
