//! Report catalog: the fixed per-type layout rules.

pub mod report_type;

pub use report_type::{DataScope, FanOut, ReportType, UnknownReportType};
