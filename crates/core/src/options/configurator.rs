//! Holds the options for the report being configured.

use std::collections::HashSet;

use chrono::NaiveDate;
use rostra_shared::types::StudentId;
use tracing::debug;

use super::error::OptionsError;
use super::request::{DisplayField, GroupingMode, ReportRequest, SelectionMode};
use crate::catalog::{FanOut, ReportType};
use crate::filter::{EntityFilter, FilterResolver, Readiness};
use crate::ledger::DateWindow;
use crate::paper::{Margin, PaperSize};

/// Report option state with a derived readiness flag.
///
/// Every setter recomputes readiness, so [`ReportConfigurator::can_generate`]
/// is always current.
#[derive(Debug, Clone)]
pub struct ReportConfigurator {
    request: ReportRequest,
    today: NaiveDate,
    readiness: Readiness,
}

impl ReportConfigurator {
    /// Starts configuring `report_type` with its defaults.
    ///
    /// `today` seeds default windows (the current month).
    #[must_use]
    pub fn new(report_type: ReportType, today: NaiveDate) -> Self {
        let request = Self::defaults(report_type, today, None);
        let readiness = FilterResolver::readiness(&request);
        Self {
            request,
            today,
            readiness,
        }
    }

    fn defaults(
        report_type: ReportType,
        today: NaiveDate,
        carried: Option<&ReportRequest>,
    ) -> ReportRequest {
        let mut request = ReportRequest::new(report_type);

        if report_type.requires_window() {
            request.window = Some(DateWindow::month_containing(today));
        }
        if matches!(report_type.fan_out(), FanOut::PerGroup | FanOut::PerSubjectGroup) {
            request.grouping = GroupingMode::ByClassGroup;
        }
        if let Some(previous) = carried {
            request.filter = previous.filter.clone();
            request.paper = previous.paper;
            request.margin = previous.margin;
        }

        request
    }

    fn refresh(&mut self) {
        self.readiness = FilterResolver::readiness(&self.request);
    }

    /// Switches report type, resetting type-specific options.
    ///
    /// The entity filter, paper and margin carry over.
    pub fn select(&mut self, report_type: ReportType) {
        self.request = Self::defaults(report_type, self.today, Some(&self.request));
        self.refresh();
        debug!(%report_type, ready = self.can_generate(), "Selected report type");
    }

    /// Current request.
    #[must_use]
    pub const fn request(&self) -> &ReportRequest {
        &self.request
    }

    /// Current readiness.
    #[must_use]
    pub const fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Returns true if the request meets its minimum selection.
    #[must_use]
    pub const fn can_generate(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Replaces the entity filter.
    pub fn set_filter(&mut self, filter: EntityFilter) {
        self.request.filter = filter;
        self.refresh();
    }

    /// Sets the date window from two dates.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Window` if `start` is after `end`; the previous
    /// window is kept.
    pub fn set_window(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), OptionsError> {
        self.request.window = Some(DateWindow::new(start, end)?);
        self.refresh();
        Ok(())
    }

    /// Removes the date window.
    pub fn clear_window(&mut self) {
        self.request.window = None;
        self.refresh();
    }

    /// Sets row grouping.
    pub fn set_grouping(&mut self, grouping: GroupingMode) {
        self.request.grouping = grouping;
        self.refresh();
    }

    /// Sets the selection mode.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::SelectionNotSupported` for explicit selections on
    /// report types that do not read one.
    pub fn set_selection(&mut self, selection: SelectionMode) -> Result<(), OptionsError> {
        if matches!(selection, SelectionMode::Selected(_))
            && !self.request.report_type.supports_selection()
        {
            return Err(OptionsError::SelectionNotSupported(self.request.report_type));
        }
        self.request.per_type.selection = selection;
        self.refresh();
        Ok(())
    }

    /// Adds or removes one student from an explicit selection.
    ///
    /// Switches to explicit mode if the selection was `All`.
    ///
    /// # Errors
    ///
    /// Same as [`ReportConfigurator::set_selection`].
    pub fn toggle_student(&mut self, id: StudentId) -> Result<(), OptionsError> {
        let mut ids = match &self.request.per_type.selection {
            SelectionMode::All => Vec::new(),
            SelectionMode::Selected(ids) => ids.clone(),
        };
        if let Some(pos) = ids.iter().position(|existing| *existing == id) {
            ids.remove(pos);
        } else {
            ids.push(id);
        }
        self.set_selection(SelectionMode::Selected(ids))
    }

    /// Sets score sheet subjects, in output order. Repeated codes keep their first position.
    pub fn set_subjects(&mut self, subjects: Vec<String>) {
        let mut seen = HashSet::new();
        self.request.per_type.subjects = subjects
            .into_iter()
            .filter(|code| seen.insert(code.clone()))
            .collect();
        self.refresh();
    }

    /// Sets the facility for facility rosters.
    pub fn set_facility(&mut self, facility: Option<String>) {
        self.request.per_type.facility = facility;
        self.refresh();
    }

    /// Turns a display field on or off.
    pub fn set_field(&mut self, field: DisplayField, enabled: bool) {
        if enabled {
            self.request.per_type.fields.insert(field);
        } else {
            self.request.per_type.fields.remove(&field);
        }
        self.refresh();
    }

    /// Sets the paper size.
    pub fn set_paper(&mut self, paper: PaperSize) {
        self.request.paper = paper;
        self.refresh();
    }

    /// Sets the margin.
    pub fn set_margin(&mut self, margin: Margin) {
        self.request.margin = margin;
        self.refresh();
    }

    /// Sets paper and margin from keywords.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Paper` for unknown keywords; nothing changes.
    pub fn set_paper_keywords(&mut self, paper: &str, margin: &str) -> Result<(), OptionsError> {
        let paper = PaperSize::parse(paper)?;
        let margin = Margin::parse(margin)?;
        self.request.paper = paper;
        self.request.margin = margin;
        self.refresh();
        Ok(())
    }

    /// Consumes the configurator, returning the request.
    #[must_use]
    pub fn into_request(self) -> ReportRequest {
        self.request
    }
}
