//! Per-run composition state.

use super::page::PageDescriptor;

/// State for one composition run, passed by `&mut` through every fan-out loop.
///
/// A fresh context is built for every run, so shared content such as the
/// preamble is emitted at most once per run and never leaks between runs.
#[derive(Debug, Default)]
pub struct RunContext {
    pending_preamble: Option<PageDescriptor>,
    preamble_emitted: bool,
    pages: Vec<PageDescriptor>,
}

impl RunContext {
    /// A context without shared content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that emits `preamble` ahead of the first content page.
    #[must_use]
    pub fn with_preamble(preamble: PageDescriptor) -> Self {
        Self {
            pending_preamble: Some(preamble),
            ..Self::default()
        }
    }

    /// Appends a content page, emitting the pending preamble first if any.
    pub fn push(&mut self, page: PageDescriptor) {
        if let Some(preamble) = self.pending_preamble.take() {
            self.pages.push(preamble);
            self.preamble_emitted = true;
        }
        self.pages.push(page);
    }

    /// Returns true if the preamble has been emitted in this run.
    #[must_use]
    pub const fn preamble_emitted(&self) -> bool {
        self.preamble_emitted
    }

    /// Pages produced so far.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Finishes the run. An unused preamble is dropped.
    #[must_use]
    pub fn into_pages(self) -> Vec<PageDescriptor> {
        self.pages
    }
}
