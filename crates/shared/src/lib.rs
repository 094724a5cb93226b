//! Shared identifiers, errors, and configuration for Rostra.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe record references
//! - The host-facing error umbrella
//! - Engine configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, NumberingSettings};
pub use error::{AppError, AppResult};
