//! Report types and their fixed fan-out, orientation and data scope.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paper::Orientation;

/// Identity cards per grid page.
pub const CARDS_PER_PAGE: usize = 8;

/// Identity card grid columns.
pub const CARD_COLUMNS: usize = 2;

/// How one request expands into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FanOut {
    /// One page for the whole working set.
    Aggregate,
    /// One page per non-empty classroom group.
    PerGroup,
    /// One page per subject crossed with each non-empty group.
    PerSubjectGroup,
    /// One page per selected entity.
    PerEntity,
    /// Fixed-size chunks of selected entities, one grid per page.
    BatchedGrid {
        /// Entities per page.
        per_page: usize,
        /// Grid columns.
        columns: usize,
    },
}

/// Which collection a report draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    /// Students narrowed by the entity filter.
    FilteredStudents,
    /// The cash book only; entity filters do not apply.
    CashBook,
    /// Every student, keyed by transfer event date.
    TransferEvents,
    /// Students assigned to one configured facility.
    Facility,
    /// Library loans borrowed inside the window.
    Loans,
    /// Students picked by the selection mode.
    Selection,
}

/// Every report the engine can compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Headcount breakdowns.
    Dashboard,
    /// Per-student billed, paid and outstanding totals.
    FinanceSummary,
    /// Cash book statement for a window.
    CashBook,
    /// Transfers in and out during a window.
    TransferRegister,
    /// Residents of one facility.
    FacilityRoster,
    /// Loans in a window.
    LibraryCirculation,
    /// Class list per group.
    ClassRoster,
    /// Daily attendance grid per group.
    AttendanceSheet,
    /// Score entry sheet per subject and group.
    ScoreSheet,
    /// One profile page per student.
    StudentProfile,
    /// One financial statement per student.
    StudentStatement,
    /// Identity cards in a grid.
    IdentityCards,
}

/// Unrecognised report type keyword.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown report type {0:?}")]
pub struct UnknownReportType(pub String);

impl ReportType {
    /// All report types in catalog order.
    pub const ALL: [Self; 12] = [
        Self::Dashboard,
        Self::FinanceSummary,
        Self::CashBook,
        Self::TransferRegister,
        Self::FacilityRoster,
        Self::LibraryCirculation,
        Self::ClassRoster,
        Self::AttendanceSheet,
        Self::ScoreSheet,
        Self::StudentProfile,
        Self::StudentStatement,
        Self::IdentityCards,
    ];

    /// Returns the string representation of the report type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::FinanceSummary => "finance_summary",
            Self::CashBook => "cash_book",
            Self::TransferRegister => "transfer_register",
            Self::FacilityRoster => "facility_roster",
            Self::LibraryCirculation => "library_circulation",
            Self::ClassRoster => "class_roster",
            Self::AttendanceSheet => "attendance_sheet",
            Self::ScoreSheet => "score_sheet",
            Self::StudentProfile => "student_profile",
            Self::StudentStatement => "student_statement",
            Self::IdentityCards => "identity_cards",
        }
    }

    /// Parses a report type keyword.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReportType` for unrecognised keywords.
    pub fn parse(keyword: &str) -> Result<Self, UnknownReportType> {
        Self::ALL
            .into_iter()
            .find(|report_type| report_type.as_str() == keyword)
            .ok_or_else(|| UnknownReportType(keyword.to_string()))
    }

    /// Document title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Enrollment Dashboard",
            Self::FinanceSummary => "Finance Summary",
            Self::CashBook => "Cash Book",
            Self::TransferRegister => "Transfer Register",
            Self::FacilityRoster => "Facility Roster",
            Self::LibraryCirculation => "Library Circulation",
            Self::ClassRoster => "Class Roster",
            Self::AttendanceSheet => "Attendance Sheet",
            Self::ScoreSheet => "Score Sheet",
            Self::StudentProfile => "Student Profile",
            Self::StudentStatement => "Student Statement",
            Self::IdentityCards => "Identity Cards",
        }
    }

    /// Fixed fan-out policy.
    #[must_use]
    pub const fn fan_out(&self) -> FanOut {
        match self {
            Self::Dashboard
            | Self::FinanceSummary
            | Self::CashBook
            | Self::TransferRegister
            | Self::FacilityRoster
            | Self::LibraryCirculation => FanOut::Aggregate,
            Self::ClassRoster | Self::AttendanceSheet => FanOut::PerGroup,
            Self::ScoreSheet => FanOut::PerSubjectGroup,
            Self::StudentProfile | Self::StudentStatement => FanOut::PerEntity,
            Self::IdentityCards => FanOut::BatchedGrid {
                per_page: CARDS_PER_PAGE,
                columns: CARD_COLUMNS,
            },
        }
    }

    /// Orientation of content pages.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        match self {
            Self::FinanceSummary
            | Self::TransferRegister
            | Self::LibraryCirculation
            | Self::ClassRoster
            | Self::AttendanceSheet
            | Self::ScoreSheet => Orientation::Landscape,
            Self::Dashboard
            | Self::CashBook
            | Self::FacilityRoster
            | Self::StudentProfile
            | Self::StudentStatement
            | Self::IdentityCards => Orientation::Portrait,
        }
    }

    /// Orientation of the shared preamble page, for types that have one.
    #[must_use]
    pub const fn preamble_orientation(&self) -> Option<Orientation> {
        match self {
            Self::ScoreSheet => Some(Orientation::Portrait),
            _ => None,
        }
    }

    /// Returns true if the type prepends one shared preamble page per run.
    #[must_use]
    pub const fn has_preamble(&self) -> bool {
        self.preamble_orientation().is_some()
    }

    /// Collection the type draws from.
    #[must_use]
    pub const fn data_scope(&self) -> DataScope {
        match self {
            Self::Dashboard
            | Self::FinanceSummary
            | Self::ClassRoster
            | Self::AttendanceSheet
            | Self::ScoreSheet => DataScope::FilteredStudents,
            Self::CashBook => DataScope::CashBook,
            Self::TransferRegister => DataScope::TransferEvents,
            Self::FacilityRoster => DataScope::Facility,
            Self::LibraryCirculation => DataScope::Loans,
            Self::StudentProfile | Self::StudentStatement | Self::IdentityCards => {
                DataScope::Selection
            }
        }
    }

    /// Returns true if the type needs a date window.
    #[must_use]
    pub const fn requires_window(&self) -> bool {
        matches!(
            self,
            Self::CashBook
                | Self::TransferRegister
                | Self::LibraryCirculation
                | Self::AttendanceSheet
                | Self::StudentStatement
        )
    }

    /// Returns true if the type supports explicit entity selection.
    #[must_use]
    pub const fn supports_selection(&self) -> bool {
        matches!(self.data_scope(), DataScope::Selection)
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
