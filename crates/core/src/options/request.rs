//! Report request value types.

use std::collections::BTreeSet;

use rostra_shared::types::StudentId;
use serde::{Deserialize, Serialize};

use crate::catalog::ReportType;
use crate::filter::EntityFilter;
use crate::ledger::DateWindow;
use crate::paper::{Margin, PaperSize};

/// Whether aggregate student reports break their rows down by class group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// One section for the whole working set.
    #[default]
    None,
    /// One section per classroom group.
    ByClassGroup,
}

/// Which entities a per-entity report covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "ids")]
pub enum SelectionMode {
    /// Everything in the filtered working set.
    #[default]
    All,
    /// An explicit list of students.
    Selected(Vec<StudentId>),
}

/// Optional fields on profile pages and identity cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayField {
    /// Issued student number.
    Identifier,
    /// Place and date of birth.
    BirthDate,
    /// Birth date in the parallel calendar.
    ParallelBirthDate,
    /// Home address.
    Address,
    /// Parent or guardian.
    Guardian,
    /// Facility assignment.
    Facility,
    /// Signature box.
    Signature,
}

impl DisplayField {
    /// Fields shown by default for a report type.
    #[must_use]
    pub fn defaults_for(report_type: ReportType) -> BTreeSet<Self> {
        match report_type {
            ReportType::StudentProfile => [
                Self::Identifier,
                Self::BirthDate,
                Self::Address,
                Self::Guardian,
            ]
            .into(),
            ReportType::IdentityCards => [Self::Identifier, Self::BirthDate].into(),
            _ => BTreeSet::new(),
        }
    }
}

/// Options that only some report types read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerTypeOptions {
    /// Entity selection for per-entity and grid reports.
    pub selection: SelectionMode,
    /// Subject codes for score sheets, in output order.
    pub subjects: Vec<String>,
    /// Facility code for facility rosters.
    pub facility: Option<String>,
    /// Enabled display fields.
    pub fields: BTreeSet<DisplayField>,
}

/// One generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Report type.
    pub report_type: ReportType,
    /// Entity filter.
    #[serde(default)]
    pub filter: EntityFilter,
    /// Date window, for report types that read one.
    #[serde(default)]
    pub window: Option<DateWindow>,
    /// Row grouping for aggregate student reports.
    #[serde(default)]
    pub grouping: GroupingMode,
    /// Type-specific options.
    #[serde(default)]
    pub per_type: PerTypeOptions,
    /// Paper size.
    #[serde(default)]
    pub paper: PaperSize,
    /// Margin.
    #[serde(default)]
    pub margin: Margin,
}

impl ReportRequest {
    /// Creates a request with every option at its default.
    #[must_use]
    pub fn new(report_type: ReportType) -> Self {
        Self {
            report_type,
            filter: EntityFilter::default(),
            window: None,
            grouping: GroupingMode::None,
            per_type: PerTypeOptions {
                fields: DisplayField::defaults_for(report_type),
                ..PerTypeOptions::default()
            },
            paper: PaperSize::default(),
            margin: Margin::default(),
        }
    }

    /// Returns true if a display field is enabled.
    #[must_use]
    pub fn shows(&self, field: DisplayField) -> bool {
        self.per_type.fields.contains(&field)
    }
}
