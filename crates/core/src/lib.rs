//! Report & ledger composition engine for Rostra.
//!
//! This crate contains pure composition logic with ZERO I/O dependencies.
//! The host loads source collections; the engine reads them and returns
//! identifiers, reconciled balances and page descriptors.
//!
//! # Modules
//!
//! - `calendar` - Parallel-calendar year and date conversions
//! - `records` - Source records supplied by the host
//! - `identifier` - Identifier generation under three numbering strategies
//! - `ledger` - Cash book and per-student statement reconciliation
//! - `catalog` - Report types and their fixed fan-out rules
//! - `filter` - Working set resolution and readiness
//! - `paper` - Paper size, margin and orientation lookup
//! - `options` - Report request options and the configuration state holder
//! - `composer` - Page composition, sessions and deferred dispatch

pub mod calendar;
pub mod catalog;
pub mod composer;
pub mod filter;
pub mod identifier;
pub mod ledger;
pub mod options;
pub mod paper;
pub mod records;
