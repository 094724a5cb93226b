//! Per-type page content builders.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::page::{
    CardContent, DashboardContent, FinanceRow, FinanceSection, LoanRow, PageContent,
    ProfileContent, RosterRow,
};
use crate::calendar::to_parallel_date;
use crate::filter::{TransferEvent, UNASSIGNED_GROUP, partition_by_group};
use crate::ledger::{
    CashBookEntry, DateWindow, reconcile_cash_book_verified, student_statement,
};
use crate::options::{DisplayField, GroupingMode, ReportRequest};
use crate::records::{Facility, LibraryLoan, SourceCollections, Student, Subject};

fn rows(students: &[&Student]) -> Vec<RosterRow> {
    students.iter().map(|student| RosterRow::from(*student)).collect()
}

/// Headcounts by status, gender and optionally group.
#[must_use]
pub fn dashboard(students: &[&Student], grouping: GroupingMode) -> PageContent {
    let mut by_status = BTreeMap::new();
    let mut by_gender = BTreeMap::new();
    let mut by_group = BTreeMap::new();

    for student in students {
        *by_status.entry(student.status.as_str().to_string()).or_insert(0) += 1;
        let gender = student.gender.map_or("unknown", |g| g.as_str());
        *by_gender.entry(gender.to_string()).or_insert(0) += 1;
        let group = student.group.as_deref().unwrap_or(UNASSIGNED_GROUP);
        *by_group.entry(group.to_string()).or_insert(0) += 1;
    }

    PageContent::Dashboard(DashboardContent {
        total: students.len(),
        by_status,
        by_gender,
        by_group: (grouping == GroupingMode::ByClassGroup).then_some(by_group),
    })
}

fn finance_row(
    sources: &SourceCollections,
    student: &Student,
    window: Option<DateWindow>,
) -> FinanceRow {
    let billed: Decimal = sources
        .charges
        .iter()
        .filter(|charge| charge.student_id == student.id)
        .filter(|charge| window.is_none_or(|w| w.contains_date(charge.issued_on)))
        .map(|charge| charge.amount)
        .sum();
    let paid: Decimal = sources
        .payments
        .iter()
        .filter(|payment| payment.student_id == student.id)
        .filter(|payment| window.is_none_or(|w| w.contains(payment.paid_at)))
        .map(|payment| payment.amount)
        .sum();

    FinanceRow {
        student: RosterRow::from(student),
        billed,
        paid,
        outstanding: billed - paid,
    }
}

fn finance_section(label: String, rows: Vec<FinanceRow>) -> FinanceSection {
    let billed = rows.iter().map(|row| row.billed).sum();
    let paid = rows.iter().map(|row| row.paid).sum();
    let outstanding = rows.iter().map(|row| row.outstanding).sum();
    FinanceSection {
        label,
        rows,
        billed,
        paid,
        outstanding,
    }
}

/// Billed, paid and outstanding totals per student.
#[must_use]
pub fn finance_summary(
    sources: &SourceCollections,
    request: &ReportRequest,
    students: &[&Student],
) -> PageContent {
    let window = request.window;
    let to_rows = |members: &[&Student]| -> Vec<FinanceRow> {
        members
            .iter()
            .map(|student| finance_row(sources, student, window))
            .collect()
    };

    let sections = match request.grouping {
        GroupingMode::None => vec![finance_section("All".to_string(), to_rows(students))],
        GroupingMode::ByClassGroup => partition_by_group(students, &sources.hierarchy)
            .into_iter()
            .map(|(label, members)| finance_section(label, to_rows(&members)))
            .collect(),
    };

    PageContent::FinanceSummary { window, sections }
}

/// Cash book statement over a window, audited first.
#[must_use]
pub fn cash_book(entries: &[CashBookEntry], window: DateWindow) -> PageContent {
    let (reconciliation, restated) = reconcile_cash_book_verified(entries, &window);
    let total_credit = reconciliation
        .series
        .iter()
        .map(CashBookEntry::signed_amount)
        .filter(|amount| amount.is_sign_positive())
        .sum();
    let total_debit = reconciliation
        .series
        .iter()
        .map(CashBookEntry::signed_amount)
        .filter(|amount| amount.is_sign_negative())
        .map(|amount| -amount)
        .sum();

    PageContent::CashBook {
        window,
        reconciliation,
        total_credit,
        total_debit,
        restated,
    }
}

/// Transfer events in a window.
#[must_use]
pub fn transfer_register(window: DateWindow, events: Vec<TransferEvent>) -> PageContent {
    PageContent::TransferRegister { window, events }
}

/// Residents of one facility.
#[must_use]
pub fn facility_roster(facility: &Facility, residents: &[&Student]) -> PageContent {
    PageContent::FacilityRoster {
        facility: facility.name.clone(),
        rows: rows(residents),
    }
}

/// Loans in a window, with overdue status as of the window end.
#[must_use]
pub fn library_circulation(
    sources: &SourceCollections,
    window: DateWindow,
    loans: &[&LibraryLoan],
) -> PageContent {
    let loans = loans
        .iter()
        .map(|loan| LoanRow {
            title: loan.title.clone(),
            borrower: sources.student(loan.student_id).map(|s| s.name.clone()),
            borrowed_on: loan.borrowed_on,
            due_on: loan.due_on,
            returned_on: loan.returned_on,
            overdue: loan.is_overdue(window.end()),
        })
        .collect();

    PageContent::LibraryCirculation { window, loans }
}

/// Class list for one group.
#[must_use]
pub fn class_roster(group: String, students: &[&Student]) -> PageContent {
    PageContent::ClassRoster {
        group,
        rows: rows(students),
    }
}

/// Attendance grid with one column per window day.
#[must_use]
pub fn attendance_sheet(group: String, window: DateWindow, students: &[&Student]) -> PageContent {
    PageContent::AttendanceSheet {
        group,
        days: window.days().collect(),
        rows: rows(students),
    }
}

/// Shared instructions for a score sheet run.
#[must_use]
pub fn score_preamble(subjects: &[&Subject]) -> PageContent {
    let names = subjects
        .iter()
        .map(|subject| subject.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    PageContent::Preamble {
        title: "Score Entry Instructions".to_string(),
        instructions: vec![
            format!("Subjects in this batch: {names}."),
            "Enter whole-number scores from 0 to 100.".to_string(),
            "Leave the cell blank for students who did not sit the assessment.".to_string(),
            "Return every sheet signed by the subject teacher.".to_string(),
        ],
    }
}

/// Score entry grid for one subject and group.
#[must_use]
pub fn score_sheet(subject: &Subject, group: String, students: &[&Student]) -> PageContent {
    PageContent::ScoreSheet {
        subject_code: subject.code.clone(),
        subject_name: subject.name.clone(),
        group,
        rows: rows(students),
    }
}

/// Profile page honouring the display field toggles.
#[must_use]
pub fn student_profile(
    sources: &SourceCollections,
    request: &ReportRequest,
    student: &Student,
) -> PageContent {
    let shows = |field| request.shows(field);
    let mut row = RosterRow::from(student);
    if !shows(DisplayField::Identifier) {
        row.identifier = None;
    }

    PageContent::StudentProfile(ProfileContent {
        student: row,
        status: student.status,
        grade: student.grade.clone(),
        birth_place: student
            .birth_place
            .clone()
            .filter(|_| shows(DisplayField::BirthDate)),
        birth_date: student.birth_date.filter(|_| shows(DisplayField::BirthDate)),
        parallel_birth_date: student
            .birth_date
            .filter(|_| shows(DisplayField::ParallelBirthDate))
            .map(|date| to_parallel_date(date).to_string()),
        address: shows(DisplayField::Address).then(|| student.address.one_line()),
        guardian: student
            .guardian_name
            .clone()
            .filter(|_| shows(DisplayField::Guardian)),
        facility: student
            .facility
            .as_deref()
            .filter(|_| shows(DisplayField::Facility))
            .map(|code| sources.facility(code).map_or(code, |f| f.name.as_str()).to_string()),
        signature: shows(DisplayField::Signature),
    })
}

/// One student's merged statement over a window.
#[must_use]
pub fn student_statement_page(
    sources: &SourceCollections,
    student: &Student,
    window: DateWindow,
) -> PageContent {
    PageContent::StudentStatement {
        student: RosterRow::from(student),
        window,
        reconciliation: student_statement(sources, student.id, &window),
    }
}

/// One page of identity cards.
#[must_use]
pub fn card_grid(
    institution: &str,
    request: &ReportRequest,
    students: &[&Student],
    columns: usize,
) -> PageContent {
    let cards = students
        .iter()
        .map(|student| {
            let mut row = RosterRow::from(*student);
            if !request.shows(DisplayField::Identifier) {
                row.identifier = None;
            }
            CardContent {
                institution: institution.to_string(),
                student: row,
                birth_date: student
                    .birth_date
                    .filter(|_| request.shows(DisplayField::BirthDate)),
                signature: request.shows(DisplayField::Signature),
            }
        })
        .collect();

    PageContent::CardGrid { columns, cards }
}
