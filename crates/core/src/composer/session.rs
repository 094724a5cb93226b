//! Composer session state machine.
//!
//! `Idle → Configuring → Generating → Ready → Idle`. A failed generation
//! returns to `Configuring` with the options intact.

use std::mem;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::compose::DocumentComposer;
use super::dispatch::generate_detached;
use super::document::GeneratedDocument;
use super::error::ComposeError;
use crate::catalog::ReportType;
use crate::options::ReportConfigurator;
use crate::records::SourceCollections;

/// Session state.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// Options are being edited.
    Configuring(ReportConfigurator),
    /// A run is in flight.
    Generating,
    /// A complete document is waiting to be taken.
    Ready(GeneratedDocument),
}

impl SessionState {
    /// State name for messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Configuring(_) => "configuring",
            Self::Generating => "generating",
            Self::Ready(_) => "ready",
        }
    }
}

/// One user's report generation session.
#[derive(Debug, Default)]
pub struct ComposerSession {
    state: SessionState,
}

impl ComposerSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    fn invalid(&self, action: &'static str) -> ComposeError {
        ComposeError::InvalidTransition {
            from: self.state.name(),
            action,
        }
    }

    /// Starts configuring a report.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidTransition` unless idle.
    pub fn begin(
        &mut self,
        report_type: ReportType,
        today: NaiveDate,
    ) -> Result<&mut ReportConfigurator, ComposeError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(self.invalid("begin"));
        }
        self.state = SessionState::Configuring(ReportConfigurator::new(report_type, today));
        self.configurator_mut()
    }

    /// The configurator being edited.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidTransition` unless configuring.
    pub fn configurator_mut(&mut self) -> Result<&mut ReportConfigurator, ComposeError> {
        let from = self.state.name();
        match &mut self.state {
            SessionState::Configuring(configurator) => Ok(configurator),
            _ => Err(ComposeError::InvalidTransition {
                from,
                action: "edit options",
            }),
        }
    }

    /// The finished document, without leaving the ready state.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidTransition` unless ready.
    pub fn document(&self) -> Result<&GeneratedDocument, ComposeError> {
        match &self.state {
            SessionState::Ready(document) => Ok(document),
            _ => Err(self.invalid("read document")),
        }
    }

    fn start_generating(&mut self) -> Result<ReportConfigurator, ComposeError> {
        match mem::replace(&mut self.state, SessionState::Generating) {
            SessionState::Configuring(configurator) => Ok(configurator),
            other => {
                self.state = other;
                Err(self.invalid("generate"))
            }
        }
    }

    fn finish(
        &mut self,
        configurator: ReportConfigurator,
        result: Result<GeneratedDocument, ComposeError>,
    ) -> Result<&GeneratedDocument, ComposeError> {
        match result {
            Ok(document) => {
                debug!(pages = document.estimated_page_count, "Session ready");
                self.state = SessionState::Ready(document);
                self.document()
            }
            Err(e) => {
                self.state = SessionState::Configuring(configurator);
                Err(e)
            }
        }
    }

    /// Generates synchronously.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidTransition` unless configuring, or the
    /// composition error (the session returns to configuring).
    pub fn generate(
        &mut self,
        composer: &DocumentComposer<'_>,
    ) -> Result<&GeneratedDocument, ComposeError> {
        let configurator = self.start_generating()?;
        let result = composer.compose(configurator.request());
        self.finish(configurator, result)
    }

    /// Generates on the blocking pool; the session is `Generating` until it completes.
    ///
    /// # Errors
    ///
    /// Same as [`ComposerSession::generate`], plus `ComposeError::Dispatch`.
    pub async fn generate_detached(
        &mut self,
        sources: Arc<SourceCollections>,
        institution: String,
    ) -> Result<&GeneratedDocument, ComposeError> {
        let configurator = self.start_generating()?;
        let result = generate_detached(sources, institution, configurator.request().clone()).await;
        self.finish(configurator, result)
    }

    /// Takes the finished document and returns to idle.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidTransition` unless ready.
    pub fn take_document(&mut self) -> Result<GeneratedDocument, ComposeError> {
        match mem::take(&mut self.state) {
            SessionState::Ready(document) => Ok(document),
            other => {
                self.state = other;
                Err(self.invalid("take document"))
            }
        }
    }

    /// Returns to idle from any state, discarding options or output.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }
}
