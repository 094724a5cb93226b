//! Document composition.
//!
//! Turns a report request into an ordered list of page descriptors:
//!
//! - `compose` - fan-out per report type (aggregate, per group, per subject
//!   and group, per entity, batched grid)
//! - `context` - per-run state threaded through fan-out loops
//! - `builders` - per-type page content
//! - `session` - `Idle → Configuring → Generating → Ready → Idle`
//! - `dispatch` - one run on the blocking pool

pub mod builders;
pub mod compose;
pub mod context;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod page;
pub mod session;

#[cfg(test)]
mod tests;

pub use compose::DocumentComposer;
pub use context::RunContext;
pub use dispatch::generate_detached;
pub use document::{CompositionWarning, GeneratedDocument};
pub use error::ComposeError;
pub use page::{PageContent, PageDescriptor};
pub use session::{ComposerSession, SessionState};
