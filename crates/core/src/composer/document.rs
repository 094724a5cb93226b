//! Generated document returned to the host.

use serde::{Deserialize, Serialize};

use super::page::PageDescriptor;
use crate::catalog::ReportType;
use crate::paper::{Margin, PageGeometry, PaperSize};

/// Non-fatal conditions attached to a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionWarning {
    /// Nothing qualified for the chosen filters; the page list is empty.
    EmptyResult,
}

/// The complete output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    /// Report type generated.
    pub report_type: ReportType,
    /// Document title.
    pub title: String,
    /// Institution printed in page headers.
    pub institution: String,
    /// Pages in output order.
    pub pages: Vec<PageDescriptor>,
    /// Number of page descriptors.
    ///
    /// Long tables may overflow onto extra physical pages at render time;
    /// this estimate does not account for that.
    pub estimated_page_count: usize,
    /// Paper size for every page.
    pub paper: PaperSize,
    /// Margin for every page.
    pub margin: Margin,
    /// Non-fatal conditions.
    pub warnings: Vec<CompositionWarning>,
}

impl GeneratedDocument {
    /// Physical geometry of one page.
    #[must_use]
    pub fn geometry_for(&self, page: &PageDescriptor) -> PageGeometry {
        PageGeometry::resolve(self.paper, self.margin, page.orientation())
    }

    /// Geometry of every page, in output order.
    #[must_use]
    pub fn geometries(&self) -> Vec<PageGeometry> {
        self.pages.iter().map(|page| self.geometry_for(page)).collect()
    }

    /// Returns true if the run produced no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
