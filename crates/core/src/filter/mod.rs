//! Report filter resolution.
//!
//! Filtering is conjunctive across the classification hierarchy (level,
//! grade, group), status, demographics and an address fragment. Some report
//! types bypass entity filtering and read one fixed collection instead.

pub mod entity;
pub mod hierarchy;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use entity::EntityFilter;
pub use hierarchy::{ClassificationHierarchy, Grade, Level};
pub use resolver::{
    BlockReason, FilterResolver, Readiness, TransferDirection, TransferEvent, UNASSIGNED_GROUP,
    WorkingSet, partition_by_group, roster_order,
};
