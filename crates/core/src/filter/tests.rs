//! Filter resolution tests.

use chrono::NaiveDate;
use rostra_shared::types::{LoanId, StudentId};

use super::hierarchy::sample_hierarchy;
use super::*;
use crate::catalog::ReportType;
use crate::composer::ComposeError;
use crate::ledger::DateWindow;
use crate::options::{ReportRequest, SelectionMode};
use crate::records::{
    Address, Facility, Gender, LibraryLoan, SourceCollections, Student, StudentStatus,
};

fn student(name: &str, grade: &str, group: Option<&str>) -> Student {
    let mut s = Student::new(name);
    s.grade = Some(grade.to_string());
    s.group = group.map(ToString::to_string);
    s
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn sources() -> SourceCollections {
    let mut zara = student("zara", "7", Some("7A"));
    zara.gender = Some(Gender::Female);
    zara.address = Address {
        village: "Sukamaju".to_string(),
        ..Address::default()
    };
    zara.facility = Some("dorm-a".to_string());

    let mut budi = student("Budi", "7", Some("7B"));
    budi.gender = Some(Gender::Male);
    budi.religion = Some("Islam".to_string());

    let mut citra = student("Citra", "8", Some("8A"));
    citra.status = StudentStatus::Graduated;
    citra.transfer_out_date = Some(date(3, 10));
    citra.transfer_institution = Some("SMP 2".to_string());

    let mut adi = student("adi", "7", Some("7A"));
    adi.transfer_in_date = Some(date(1, 5));
    adi.facility = Some("dorm-a".to_string());

    SourceCollections {
        students: vec![zara, budi, citra, adi],
        facilities: vec![Facility {
            code: "dorm-a".to_string(),
            name: "Dormitory A".to_string(),
        }],
        hierarchy: sample_hierarchy(),
        ..SourceCollections::default()
    }
}

fn names(working: &WorkingSet<'_>) -> Vec<String> {
    match working {
        WorkingSet::Students(students) | WorkingSet::Facility(_, students) => {
            students.iter().map(|s| s.name.clone()).collect()
        }
        other => panic!("expected students, got {other:?}"),
    }
}

#[test]
fn test_students_sorted_by_group_then_name() {
    let sources = sources();
    let request = ReportRequest::new(ReportType::ClassRoster);

    let working = FilterResolver::resolve(&request, &sources).unwrap();
    assert_eq!(names(&working), vec!["adi", "zara", "Budi", "Citra"]);
}

#[test]
fn test_filters_are_conjunctive() {
    let sources = sources();
    let mut request = ReportRequest::new(ReportType::Dashboard);
    request.filter = EntityFilter::new()
        .with_level("junior")
        .with_grade("7")
        .with_gender(Gender::Female)
        .with_address_fragment("SUKA");

    let working = FilterResolver::resolve(&request, &sources).unwrap();
    assert_eq!(names(&working), vec!["zara"]);

    request.filter = EntityFilter::new().with_religion("islam");
    let working = FilterResolver::resolve(&request, &sources).unwrap();
    assert_eq!(names(&working), vec!["Budi"]);
}

#[test]
fn test_level_inherited_from_grade() {
    let sources = sources();
    let mut request = ReportRequest::new(ReportType::Dashboard);
    request.filter = EntityFilter::new().with_level("junior");

    assert_eq!(FilterResolver::resolve(&request, &sources).unwrap().len(), 4);

    request.filter = EntityFilter::new().with_level("senior");
    assert!(FilterResolver::resolve(&request, &sources).unwrap().is_empty());
}

#[test]
fn test_grade_outside_level_yields_nothing() {
    let sources = sources();
    let mut request = ReportRequest::new(ReportType::ClassRoster);
    request.filter = EntityFilter::new().with_level("senior").with_grade("7");

    assert!(FilterResolver::resolve(&request, &sources).unwrap().is_empty());

    request.filter = EntityFilter::new().with_grade("7").with_group("8A");
    assert!(FilterResolver::resolve(&request, &sources).unwrap().is_empty());
}

#[test]
fn test_status_filter() {
    let sources = sources();
    let mut request = ReportRequest::new(ReportType::FinanceSummary);
    request.filter = EntityFilter::new().with_status(StudentStatus::Graduated);

    let working = FilterResolver::resolve(&request, &sources).unwrap();
    assert_eq!(names(&working), vec!["Citra"]);
}

#[test]
fn test_explicit_selection_ignores_filter_and_unknown_ids() {
    let sources = sources();
    let citra = sources.students[2].id;
    let zara = sources.students[0].id;

    let mut request = ReportRequest::new(ReportType::StudentProfile);
    request.filter = EntityFilter::new().with_grade("7");
    request.per_type.selection =
        SelectionMode::Selected(vec![citra, StudentId::new(), zara, citra]);

    let working = FilterResolver::resolve(&request, &sources).unwrap();
    assert_eq!(names(&working), vec!["zara", "Citra"]);
}

#[test]
fn test_transfer_register_reads_full_population_by_event_date() {
    let sources = sources();
    let mut request = ReportRequest::new(ReportType::TransferRegister);
    request.filter = EntityFilter::new().with_grade("9");
    request.window = Some(DateWindow::new(date(1, 1), date(3, 10)).unwrap());

    let WorkingSet::Transfers(events) = FilterResolver::resolve(&request, &sources).unwrap() else {
        panic!("expected transfers");
    };
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "adi");
    assert_eq!(events[0].direction, TransferDirection::In);
    assert_eq!(events[1].direction, TransferDirection::Out);
    assert_eq!(events[1].institution.as_deref(), Some("SMP 2"));

    request.window = Some(DateWindow::new(date(1, 6), date(3, 9)).unwrap());
    assert!(FilterResolver::resolve(&request, &sources).unwrap().is_empty());
}

#[test]
fn test_facility_roster_bypasses_filter() {
    let sources = sources();
    let mut request = ReportRequest::new(ReportType::FacilityRoster);
    request.filter = EntityFilter::new().with_gender(Gender::Male);
    request.per_type.facility = Some("dorm-a".to_string());

    let working = FilterResolver::resolve(&request, &sources).unwrap();
    assert_eq!(names(&working), vec!["adi", "zara"]);

    request.per_type.facility = Some("dorm-z".to_string());
    let err = FilterResolver::resolve(&request, &sources).unwrap_err();
    assert!(matches!(err, ComposeError::UnknownFacility(code) if code == "dorm-z"));
}

#[test]
fn test_loans_in_window() {
    let mut sources = sources();
    let borrower = sources.students[0].id;
    let loan = |title: &str, day: u32| LibraryLoan {
        id: LoanId::new(),
        student_id: borrower,
        title: title.to_string(),
        borrowed_on: date(4, day),
        due_on: date(4, day + 7),
        returned_on: None,
    };
    sources.loans = vec![loan("Zoology", 3), loan("Atlas", 3), loan("Biology", 20)];

    let mut request = ReportRequest::new(ReportType::LibraryCirculation);
    request.window = Some(DateWindow::new(date(4, 1), date(4, 10)).unwrap());

    let WorkingSet::Loans(loans) = FilterResolver::resolve(&request, &sources).unwrap() else {
        panic!("expected loans");
    };
    let titles: Vec<_> = loans.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Atlas", "Zoology"]);
}

#[test]
fn test_blocked_request_is_not_resolved() {
    let sources = sources();
    let request = ReportRequest::new(ReportType::CashBook);

    assert_eq!(
        FilterResolver::readiness(&request),
        Readiness::Blocked(BlockReason::MissingWindow)
    );
    assert!(matches!(
        FilterResolver::resolve(&request, &sources),
        Err(ComposeError::NotReady(BlockReason::MissingWindow))
    ));
}

#[test]
fn test_partition_orders_hierarchy_groups_first_and_drops_empty() {
    let mut students = vec![
        student("a", "7", Some("7C")),
        student("b", "7", Some("7A")),
        student("c", "9", Some("9Z")),
        student("d", "7", None),
    ];
    students[0].name = "Ana".to_string();
    let refs: Vec<&Student> = students.iter().collect();

    let partitions = partition_by_group(&refs, &sample_hierarchy());
    let labels: Vec<_> = partitions.iter().map(|(label, _)| label.as_str()).collect();

    assert_eq!(labels, vec!["7A", "7C", "9Z", UNASSIGNED_GROUP]);
    assert!(partitions.iter().all(|(_, members)| !members.is_empty()));
}

fn hierarchy_with_shared_group_names() -> ClassificationHierarchy {
    let grade = |code: &str| Grade {
        code: code.to_string(),
        groups: vec!["A".to_string(), "B".to_string()],
    };
    ClassificationHierarchy {
        levels: vec![Level {
            code: "junior".to_string(),
            name: "Junior High".to_string(),
            grades: vec![grade("7"), grade("8")],
        }],
    }
}

#[test]
fn test_partition_group_repeated_across_grades_appears_once() {
    let students = [
        student("Ayu", "7", Some("A")),
        student("Budi", "8", Some("B")),
    ];
    let refs: Vec<&Student> = students.iter().collect();

    let partitions = partition_by_group(&refs, &hierarchy_with_shared_group_names());
    let labels: Vec<_> = partitions.iter().map(|(label, _)| label.as_str()).collect();

    assert_eq!(labels, vec!["A", "B"]);
    assert_eq!(partitions[0].1.len(), 1);
    assert_eq!(partitions[1].1.len(), 1);
}
