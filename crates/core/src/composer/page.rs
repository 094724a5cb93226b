//! Page descriptors and their content.
//!
//! Content is an opaque render unit for the host; the engine only decides
//! what goes on each page and which way it faces.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rostra_shared::types::StudentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::TransferEvent;
use crate::ledger::{CashBookEntry, ContinuityBreak, DateWindow, Reconciliation, StatementLine};
use crate::paper::Orientation;
use crate::records::{Gender, Student, StudentStatus};

/// One row of a student list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Student record ID.
    pub student_id: StudentId,
    /// Issued student number.
    pub identifier: Option<String>,
    /// Name.
    pub name: String,
    /// Gender.
    pub gender: Option<Gender>,
    /// Classroom group.
    pub group: Option<String>,
}

impl From<&Student> for RosterRow {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.id,
            identifier: student.identifier.clone(),
            name: student.name.clone(),
            gender: student.gender,
            group: student.group.clone(),
        }
    }
}

/// Headcounts for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardContent {
    /// Students in the working set.
    pub total: usize,
    /// Count per status keyword.
    pub by_status: BTreeMap<String, usize>,
    /// Count per gender keyword; `unknown` when unrecorded.
    pub by_gender: BTreeMap<String, usize>,
    /// Count per classroom group, when grouped.
    pub by_group: Option<BTreeMap<String, usize>>,
}

/// Billing totals for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRow {
    /// Student.
    pub student: RosterRow,
    /// Charges issued.
    pub billed: Decimal,
    /// Payments received.
    pub paid: Decimal,
    /// `billed - paid`.
    pub outstanding: Decimal,
}

/// A titled block of finance rows with subtotals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSection {
    /// Group label, or `All` when ungrouped.
    pub label: String,
    /// Rows in roster order.
    pub rows: Vec<FinanceRow>,
    /// Sum of `billed`.
    pub billed: Decimal,
    /// Sum of `paid`.
    pub paid: Decimal,
    /// Sum of `outstanding`.
    pub outstanding: Decimal,
}

/// One loan line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRow {
    /// Book title.
    pub title: String,
    /// Borrower name; `None` if the borrower record is missing.
    pub borrower: Option<String>,
    /// Date borrowed.
    pub borrowed_on: NaiveDate,
    /// Date due.
    pub due_on: NaiveDate,
    /// Date returned.
    pub returned_on: Option<NaiveDate>,
    /// Overdue as of the window end.
    pub overdue: bool,
}

/// Profile page fields. Optional fields are `None` when their toggle is off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContent {
    /// Name and group.
    pub student: RosterRow,
    /// Status.
    pub status: StudentStatus,
    /// Grade.
    pub grade: Option<String>,
    /// Place of birth.
    pub birth_place: Option<String>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Date of birth in the parallel calendar, rendered.
    pub parallel_birth_date: Option<String>,
    /// One-line address.
    pub address: Option<String>,
    /// Parent or guardian.
    pub guardian: Option<String>,
    /// Facility name.
    pub facility: Option<String>,
    /// Render a signature box.
    pub signature: bool,
}

/// One identity card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    /// Institution printed on the card.
    pub institution: String,
    /// Name and group.
    pub student: RosterRow,
    /// Date of birth, when enabled.
    pub birth_date: Option<NaiveDate>,
    /// Render a signature strip.
    pub signature: bool,
}

/// What goes on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PageContent {
    /// Shared instructions emitted once per run.
    Preamble {
        /// Heading.
        title: String,
        /// Instruction lines.
        instructions: Vec<String>,
    },
    /// Headcount dashboard.
    Dashboard(DashboardContent),
    /// Billing summary.
    FinanceSummary {
        /// Window charges and payments are limited to, if any.
        window: Option<DateWindow>,
        /// Sections in roster order.
        sections: Vec<FinanceSection>,
    },
    /// Cash book statement.
    CashBook {
        /// Statement window.
        window: DateWindow,
        /// Opening, closing and in-window entries.
        reconciliation: Reconciliation<CashBookEntry>,
        /// Sum of in-window credits.
        total_credit: Decimal,
        /// Sum of in-window debits.
        total_debit: Decimal,
        /// Stored-balance breaks found and restated before reconciling.
        restated: Vec<ContinuityBreak>,
    },
    /// Transfers in and out.
    TransferRegister {
        /// Register window.
        window: DateWindow,
        /// Events by date.
        events: Vec<TransferEvent>,
    },
    /// Residents of a facility.
    FacilityRoster {
        /// Facility name.
        facility: String,
        /// Residents in roster order.
        rows: Vec<RosterRow>,
    },
    /// Loans in a window.
    LibraryCirculation {
        /// Circulation window.
        window: DateWindow,
        /// Loans by borrow date.
        loans: Vec<LoanRow>,
    },
    /// Class list for one group.
    ClassRoster {
        /// Group label.
        group: String,
        /// Students in the group.
        rows: Vec<RosterRow>,
    },
    /// Attendance grid for one group.
    AttendanceSheet {
        /// Group label.
        group: String,
        /// Column dates.
        days: Vec<NaiveDate>,
        /// Row students.
        rows: Vec<RosterRow>,
    },
    /// Score entry grid for one subject and group.
    ScoreSheet {
        /// Subject code.
        subject_code: String,
        /// Subject name.
        subject_name: String,
        /// Group label.
        group: String,
        /// Row students.
        rows: Vec<RosterRow>,
    },
    /// Single student profile.
    StudentProfile(ProfileContent),
    /// Single student financial statement.
    StudentStatement {
        /// Student.
        student: RosterRow,
        /// Statement window.
        window: DateWindow,
        /// Opening, closing and folded lines.
        reconciliation: Reconciliation<StatementLine>,
    },
    /// A grid of identity cards.
    CardGrid {
        /// Grid columns.
        columns: usize,
        /// Cards, at most one page's worth.
        cards: Vec<CardContent>,
    },
}

/// One output page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    content: PageContent,
    orientation: Orientation,
}

impl PageDescriptor {
    /// Creates a page.
    #[must_use]
    pub const fn new(content: PageContent, orientation: Orientation) -> Self {
        Self {
            content,
            orientation,
        }
    }

    /// Page content.
    #[must_use]
    pub const fn content(&self) -> &PageContent {
        &self.content
    }

    /// Page orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns true if this is a preamble page.
    #[must_use]
    pub const fn is_preamble(&self) -> bool {
        matches!(self.content, PageContent::Preamble { .. })
    }
}
