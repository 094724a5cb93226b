//! Fan-out of a resolved working set into pages.

use std::collections::HashSet;

use tracing::{debug, info};

use super::builders;
use super::context::RunContext;
use super::document::{CompositionWarning, GeneratedDocument};
use super::error::ComposeError;
use super::page::PageDescriptor;
use crate::catalog::{FanOut, ReportType};
use crate::filter::{BlockReason, FilterResolver, WorkingSet, partition_by_group};
use crate::ledger::DateWindow;
use crate::options::ReportRequest;
use crate::records::{SourceCollections, Student, Subject};

/// Composes documents from one set of source collections.
///
/// Source collections are only ever read.
#[derive(Debug, Clone)]
pub struct DocumentComposer<'a> {
    sources: &'a SourceCollections,
    institution: String,
}

impl<'a> DocumentComposer<'a> {
    /// Creates a composer.
    #[must_use]
    pub fn new(sources: &'a SourceCollections, institution: impl Into<String>) -> Self {
        Self {
            sources,
            institution: institution.into(),
        }
    }

    /// Runs one generation.
    ///
    /// Returns the complete page list or an error; never a partial result.
    /// An empty working set yields an empty document with
    /// [`CompositionWarning::EmptyResult`].
    ///
    /// # Errors
    ///
    /// - `ComposeError::NotReady` if the request is blocked
    /// - `ComposeError::UnknownFacility` / `UnknownSubject` for dangling references
    pub fn compose(&self, request: &ReportRequest) -> Result<GeneratedDocument, ComposeError> {
        let report_type = request.report_type;
        let working = FilterResolver::resolve(request, self.sources)?;

        let mut warnings = Vec::new();
        let pages = if working.is_empty() {
            warnings.push(CompositionWarning::EmptyResult);
            Vec::new()
        } else {
            let mut ctx = self.context_for(request)?;
            self.fan_out(request, &working, &mut ctx)?;
            ctx.into_pages()
        };

        info!(
            %report_type,
            pages = pages.len(),
            empty = warnings.contains(&CompositionWarning::EmptyResult),
            "Composed document"
        );

        Ok(GeneratedDocument {
            report_type,
            title: report_type.title().to_string(),
            institution: self.institution.clone(),
            estimated_page_count: pages.len(),
            pages,
            paper: request.paper,
            margin: request.margin,
            warnings,
        })
    }

    fn subjects(&self, request: &ReportRequest) -> Result<Vec<&'a Subject>, ComposeError> {
        let mut seen = HashSet::new();
        request
            .per_type
            .subjects
            .iter()
            .filter(|code| seen.insert(code.as_str()))
            .map(|code| {
                self.sources
                    .subject(code)
                    .ok_or_else(|| ComposeError::UnknownSubject(code.clone()))
            })
            .collect()
    }

    fn context_for(&self, request: &ReportRequest) -> Result<RunContext, ComposeError> {
        let report_type = request.report_type;
        match (report_type, report_type.preamble_orientation()) {
            (ReportType::ScoreSheet, Some(orientation)) => {
                let preamble = builders::score_preamble(&self.subjects(request)?);
                Ok(RunContext::with_preamble(PageDescriptor::new(preamble, orientation)))
            }
            _ => Ok(RunContext::new()),
        }
    }

    fn fan_out(
        &self,
        request: &ReportRequest,
        working: &WorkingSet<'a>,
        ctx: &mut RunContext,
    ) -> Result<(), ComposeError> {
        let report_type = request.report_type;
        let orientation = report_type.orientation();
        let page = |content| PageDescriptor::new(content, orientation);

        match report_type.fan_out() {
            FanOut::Aggregate => {
                let content = match working {
                    WorkingSet::CashBook(entries) => builders::cash_book(entries, window(request)?),
                    WorkingSet::Transfers(events) => {
                        builders::transfer_register(window(request)?, events.clone())
                    }
                    WorkingSet::Facility(facility, residents) => {
                        builders::facility_roster(facility, residents)
                    }
                    WorkingSet::Loans(loans) => {
                        builders::library_circulation(self.sources, window(request)?, loans)
                    }
                    WorkingSet::Students(students) if report_type == ReportType::FinanceSummary => {
                        builders::finance_summary(self.sources, request, students)
                    }
                    WorkingSet::Students(students) => {
                        builders::dashboard(students, request.grouping)
                    }
                };
                ctx.push(page(content));
            }
            FanOut::PerGroup => {
                let partitions = partition_by_group(students(working), &self.sources.hierarchy);
                for (group, members) in partitions {
                    let content = match report_type {
                        ReportType::AttendanceSheet => {
                            builders::attendance_sheet(group, window(request)?, &members)
                        }
                        _ => builders::class_roster(group, &members),
                    };
                    ctx.push(page(content));
                }
            }
            FanOut::PerSubjectGroup => {
                let partitions = partition_by_group(students(working), &self.sources.hierarchy);
                for subject in self.subjects(request)? {
                    for (group, members) in &partitions {
                        debug!(subject = %subject.code, %group, "Composing score sheet");
                        ctx.push(page(builders::score_sheet(subject, group.clone(), members)));
                    }
                }
            }
            FanOut::PerEntity => {
                for student in students(working) {
                    let content = match report_type {
                        ReportType::StudentStatement => {
                            let period = window(request)?;
                            builders::student_statement_page(self.sources, student, period)
                        }
                        _ => builders::student_profile(self.sources, request, student),
                    };
                    ctx.push(page(content));
                }
            }
            FanOut::BatchedGrid { per_page, columns } => {
                for chunk in students(working).chunks(per_page.max(1)) {
                    ctx.push(page(builders::card_grid(&self.institution, request, chunk, columns)));
                }
            }
        }

        Ok(())
    }
}

fn window(request: &ReportRequest) -> Result<DateWindow, ComposeError> {
    request
        .window
        .ok_or(ComposeError::NotReady(BlockReason::MissingWindow))
}

fn students<'s, 'a>(working: &'s WorkingSet<'a>) -> &'s [&'a Student] {
    match working {
        WorkingSet::Students(students) | WorkingSet::Facility(_, students) => students,
        WorkingSet::CashBook(_) | WorkingSet::Transfers(_) | WorkingSet::Loans(_) => &[],
    }
}
