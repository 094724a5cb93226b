//! Identifier generation for new records.
//!
//! Three numbering strategies are selectable per deployment:
//!
//! - `template` - count siblings by classification and intake year, render
//!   `{YY}`, `{HY}`, `{CODE}` and `{SEQ}` through a template
//! - `global` - fixed prefix plus the highest existing suffix + 1
//! - `birth_date` - formatted birth date plus a same-date counter
//!
//! All three are pure functions over the loaded record set.
//! [`ScopeCounterRegistry`] adds compare-and-swap arbitration when several
//! writers in one process draw from the same scope.

pub mod counter;
pub mod error;
pub mod placeholder;
pub mod policy;
pub mod service;
pub mod strategy;


pub use counter::ScopeCounterRegistry;
pub use error::IdentifierError;
pub use placeholder::substitute;
pub use policy::{
    BirthDateLayout, ClassificationCounter, IdentifierScope, StrategyKind, YearFormat, YearSource,
};
pub use service::IdentifierGenerator;
pub use strategy::{Counting, GroupedCount, MaxScan, ScopeKey, SequenceStrategy};
