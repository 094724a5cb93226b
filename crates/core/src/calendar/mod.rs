//! Gregorian to Hijri (parallel calendar) conversions.
//!
//! Two conversions live here and they intentionally disagree at the edges:
//! - [`hijri_year_approximation`] is the linear year formula embedded in
//!   generated identifiers. It must stay stable because issued identifiers
//!   already contain its output.
//! - [`to_parallel_date`] uses the tabular (arithmetic) calendar and is what
//!   printed pages show next to Gregorian dates. It can differ by a day from
//!   observational calendars.
//!
//! Both are integer-only.

mod hijri;

pub use hijri::{ParallelDate, hijri_year_approximation, to_parallel_date, two_digit_year};
