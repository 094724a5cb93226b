//! Paper size, margin and orientation lookup.
//!
//! A pure table: keywords map to millimetre dimensions, and orientation
//! swaps width and height for one page without touching the table.

pub mod error;
pub mod geometry;

pub use error::PaperError;
pub use geometry::{Margin, Orientation, PageGeometry, PaperSize};
