//! Report options and the configuration state holder.

pub mod configurator;
pub mod error;
pub mod request;

pub use configurator::ReportConfigurator;
pub use error::OptionsError;
pub use request::{DisplayField, GroupingMode, PerTypeOptions, ReportRequest, SelectionMode};
