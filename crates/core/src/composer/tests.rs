//! End-to-end composition tests.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rostra_shared::types::{CashBookEntryId, StudentId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::catalog::ReportType;
use crate::filter::hierarchy::sample_hierarchy;
use crate::filter::{BlockReason, ClassificationHierarchy, EntityFilter, Grade, Level};
use crate::ledger::{CashBookEntry, DateWindow, Direction};
use crate::options::{ReportRequest, SelectionMode};
use crate::paper::{Orientation, PaperSize};
use crate::records::{Gender, SourceCollections, Student, Subject};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn student(name: &str, group: &str, gender: Gender) -> Student {
    let mut s = Student::new(name);
    s.grade = group.get(..1).map(ToString::to_string);
    s.group = Some(group.to_string());
    s.gender = Some(gender);
    s
}

fn subject(code: &str) -> Subject {
    Subject {
        code: code.to_string(),
        name: code.to_uppercase(),
    }
}

/// Three groups in grade 7; 7C only has a male student.
fn school() -> SourceCollections {
    SourceCollections {
        students: vec![
            student("Ayu", "7A", Gender::Female),
            student("Bunga", "7A", Gender::Female),
            student("Citra", "7B", Gender::Female),
            student("Dodi", "7C", Gender::Male),
        ],
        subjects: vec![subject("math"), subject("science"), subject("art"), subject("music")],
        hierarchy: sample_hierarchy(),
        ..SourceCollections::default()
    }
}

fn many_students(n: usize) -> SourceCollections {
    SourceCollections {
        students: (0..n)
            .map(|i| student(&format!("Student {i:02}"), "7A", Gender::Male))
            .collect(),
        ..SourceCollections::default()
    }
}

fn group_of(page: &PageDescriptor) -> Option<&str> {
    match page.content() {
        PageContent::ClassRoster { group, .. } | PageContent::ScoreSheet { group, .. } => {
            Some(group.as_str())
        }
        _ => None,
    }
}

// ============================================================================
// Fan-out
// ============================================================================

#[test]
fn test_per_group_skips_groups_emptied_by_filter() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ClassRoster);
    request.filter = EntityFilter::new().with_gender(Gender::Female);

    let document = composer.compose(&request).unwrap();

    assert_eq!(document.pages.len(), 2);
    assert_eq!(document.estimated_page_count, 2);
    let groups: Vec<_> = document.pages.iter().filter_map(group_of).collect();
    assert_eq!(groups, vec!["7A", "7B"]);
    assert!(
        document
            .pages
            .iter()
            .all(|p| p.orientation() == Orientation::Landscape)
    );
}

#[test]
fn test_per_group_one_page_when_group_name_repeats_across_grades() {
    let grade = |code: &str| Grade {
        code: code.to_string(),
        groups: vec!["A".to_string()],
    };
    let mut ayu = Student::new("Ayu");
    ayu.grade = Some("7".to_string());
    ayu.group = Some("A".to_string());
    let sources = SourceCollections {
        students: vec![ayu],
        hierarchy: ClassificationHierarchy {
            levels: vec![Level {
                code: "junior".to_string(),
                name: "Junior High".to_string(),
                grades: vec![grade("7"), grade("8")],
            }],
        },
        ..SourceCollections::default()
    };
    let composer = DocumentComposer::new(&sources, "Rostra School");

    let document = composer.compose(&ReportRequest::new(ReportType::ClassRoster)).unwrap();

    assert_eq!(document.pages.len(), 1);
    assert_eq!(document.estimated_page_count, 1);
    assert_eq!(group_of(&document.pages[0]), Some("A"));
}

#[test]
fn test_score_sheet_preamble_once_and_first() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ScoreSheet);
    request.per_type.subjects = vec![
        "math".to_string(),
        "science".to_string(),
        "art".to_string(),
        "music".to_string(),
    ];
    request.filter = EntityFilter::new().with_gender(Gender::Female);

    for _ in 0..2 {
        let document = composer.compose(&request).unwrap();

        // 4 subjects x 2 non-empty groups, plus one preamble.
        assert_eq!(document.pages.len(), 9);
        assert!(document.pages[0].is_preamble());
        assert_eq!(document.pages.iter().filter(|p| p.is_preamble()).count(), 1);
        assert_eq!(document.pages[0].orientation(), Orientation::Portrait);
        assert_eq!(document.pages[1].orientation(), Orientation::Landscape);
    }
}

#[test]
fn test_score_sheet_iterates_subject_then_group() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ScoreSheet);
    request.per_type.subjects = vec!["art".to_string(), "math".to_string()];

    let document = composer.compose(&request).unwrap();
    let sheets: Vec<_> = document
        .pages
        .iter()
        .filter_map(|page| match page.content() {
            PageContent::ScoreSheet {
                subject_code, group, ..
            } => Some(format!("{subject_code}/{group}")),
            _ => None,
        })
        .collect();

    assert_eq!(
        sheets,
        vec!["art/7A", "art/7B", "art/7C", "math/7A", "math/7B", "math/7C"]
    );
}

#[test]
fn test_repeated_subject_yields_one_set_of_sheets() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ScoreSheet);
    request.per_type.subjects = vec!["math".to_string(), "math".to_string()];

    let document = composer.compose(&request).unwrap();

    // One preamble plus math for 7A, 7B and 7C.
    assert_eq!(document.pages.len(), 4);
}

#[test]
fn test_unknown_subject_fails_whole_run() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ScoreSheet);
    request.per_type.subjects = vec!["math".to_string(), "latin".to_string()];

    let err = composer.compose(&request).unwrap_err();
    assert_eq!(err, ComposeError::UnknownSubject("latin".to_string()));
}

#[test]
fn test_batched_grid_chunks_of_eight() {
    let sources = many_students(17);
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let request = ReportRequest::new(ReportType::IdentityCards);

    let document = composer.compose(&request).unwrap();

    let sizes: Vec<usize> = document
        .pages
        .iter()
        .map(|page| match page.content() {
            PageContent::CardGrid { cards, columns } => {
                assert_eq!(*columns, 2);
                cards.len()
            }
            other => panic!("unexpected page {other:?}"),
        })
        .collect();
    assert_eq!(sizes, vec![8, 8, 1]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// Every card lands on exactly one page and only the last page is partial.
    #[test]
    fn prop_batched_grid_sizing(n in 1usize..60) {
        let sources = many_students(n);
        let composer = DocumentComposer::new(&sources, "Rostra School");
        let document = composer.compose(&ReportRequest::new(ReportType::IdentityCards)).unwrap();

        let sizes: Vec<usize> = document
            .pages
            .iter()
            .filter_map(|page| match page.content() {
                PageContent::CardGrid { cards, .. } => Some(cards.len()),
                _ => None,
            })
            .collect();

        prop_assert_eq!(sizes.len(), n.div_ceil(8));
        prop_assert_eq!(document.estimated_page_count, sizes.len());
        prop_assert_eq!(sizes.iter().sum::<usize>(), n);
        prop_assert!(sizes[..sizes.len() - 1].iter().all(|size| *size == 8));
    }
}

#[test]
fn test_per_entity_follows_selection() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::StudentStatement);
    request.window = Some(DateWindow::month_containing(date(5, 1)));
    request.per_type.selection =
        SelectionMode::Selected(vec![sources.students[3].id, sources.students[0].id]);

    let document = composer.compose(&request).unwrap();

    let names: Vec<_> = document
        .pages
        .iter()
        .map(|page| match page.content() {
            PageContent::StudentStatement {
                student,
                reconciliation,
                ..
            } => {
                assert_eq!(reconciliation.closing, Decimal::ZERO);
                student.name.clone()
            }
            other => panic!("unexpected page {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["Ayu", "Dodi"]);
}

#[test]
fn test_empty_result_is_a_warning() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ScoreSheet);
    request.per_type.subjects = vec!["math".to_string()];
    request.filter = EntityFilter::new().with_grade("10");

    let document = composer.compose(&request).unwrap();

    assert!(document.is_empty());
    assert_eq!(document.estimated_page_count, 0);
    assert_eq!(document.warnings, vec![CompositionWarning::EmptyResult]);
}

#[test]
fn test_blocked_request_errors() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::IdentityCards);
    request.per_type.selection = SelectionMode::Selected(Vec::new());

    assert_eq!(
        composer.compose(&request).unwrap_err(),
        ComposeError::NotReady(BlockReason::NoEntitiesSelected)
    );
}

#[test]
fn test_cash_book_scenario() {
    let entry = |day: u32, direction: Direction, amount: Decimal, balance: Decimal| CashBookEntry {
        id: CashBookEntryId::new(),
        recorded_at: date(1, day).and_hms_opt(12, 0, 0).unwrap(),
        direction,
        amount,
        category: "general".to_string(),
        description: String::new(),
        running_balance: balance,
    };
    let sources = SourceCollections {
        cash_book: vec![
            entry(1, Direction::Credit, dec!(1000), dec!(1000)),
            entry(5, Direction::Debit, dec!(200), dec!(800)),
            entry(10, Direction::Credit, dec!(500), dec!(1300)),
        ],
        ..SourceCollections::default()
    };
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::CashBook);
    request.window = Some(DateWindow::new(date(1, 3), date(1, 8)).unwrap());
    request.paper = PaperSize::F4;

    let document = composer.compose(&request).unwrap();
    assert_eq!(document.pages.len(), 1);

    let PageContent::CashBook {
        reconciliation,
        restated,
        ..
    } = document.pages[0].content()
    else {
        panic!("expected cash book");
    };
    assert_eq!(reconciliation.opening, dec!(1000));
    assert_eq!(reconciliation.closing, dec!(800));
    assert_eq!(reconciliation.series.len(), 1);
    assert_eq!(reconciliation.series[0].amount, dec!(200));
    assert!(restated.is_empty());

    let geometry = document.geometry_for(&document.pages[0]);
    assert_eq!((geometry.width_mm, geometry.height_mm), (dec!(215), dec!(330)));
}

#[test]
fn test_landscape_pages_swap_geometry() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut request = ReportRequest::new(ReportType::ScoreSheet);
    request.per_type.subjects = vec!["math".to_string()];

    let document = composer.compose(&request).unwrap();
    let geometries = document.geometries();

    assert_eq!(geometries[0].width_mm, dec!(210));
    assert_eq!(geometries[1].width_mm, dec!(297));
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_session_round_trip() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut session = ComposerSession::new();

    assert!(matches!(
        session.generate(&composer),
        Err(ComposeError::InvalidTransition { from: "idle", .. })
    ));

    session.begin(ReportType::ClassRoster, date(2, 1)).unwrap();
    assert!(session.begin(ReportType::Dashboard, date(2, 1)).is_err());

    let pages = session.generate(&composer).unwrap().pages.len();
    assert_eq!(pages, 3);
    assert_eq!(session.state().name(), "ready");
    assert!(session.configurator_mut().is_err());

    let document = session.take_document().unwrap();
    assert_eq!(document.report_type, ReportType::ClassRoster);
    assert_eq!(session.state().name(), "idle");
    assert!(session.take_document().is_err());
}

#[test]
fn test_failed_generation_returns_to_configuring() {
    let sources = school();
    let composer = DocumentComposer::new(&sources, "Rostra School");
    let mut session = ComposerSession::new();

    session
        .begin(ReportType::FacilityRoster, date(2, 1))
        .unwrap()
        .set_facility(Some("missing".to_string()));

    let err = session.generate(&composer).unwrap_err();
    assert_eq!(err, ComposeError::UnknownFacility("missing".to_string()));
    assert_eq!(session.state().name(), "configuring");

    session.reset();
    assert_eq!(session.state().name(), "idle");
}

#[tokio::test]
async fn test_detached_generation_returns_complete_document() {
    let sources = Arc::new(many_students(17));
    let mut request = ReportRequest::new(ReportType::StudentProfile);
    request.per_type.selection =
        SelectionMode::Selected(vec![sources.students[16].id, StudentId::new()]);

    let document = generate_detached(Arc::clone(&sources), "Rostra School".to_string(), request)
        .await
        .unwrap();
    assert_eq!(document.pages.len(), 1);
    assert_eq!(document.institution, "Rostra School");

    let mut session = ComposerSession::new();
    session.begin(ReportType::IdentityCards, date(2, 1)).unwrap();
    let document = session
        .generate_detached(sources, "Rostra School".to_string())
        .await
        .unwrap();
    assert_eq!(document.estimated_page_count, 3);
}
