//! The quiz setting override engine.
//!
//! An override supersedes a subset of one quiz's settings for a single user
//! or a single group. The engine validates candidate overrides against the
//! quiz's current settings and the existing records, persists them through
//! the [`store::OverrideStore`] seam, and coordinates the side effects of
//! every write: cache invalidation, audit events and calendar
//! synchronization.
//!
//! [`manager::OverrideManager`] is the only entry point that mutates
//! anything; [`batch`] wraps it in the per-item batch contract exposed to
//! remote callers.

pub mod batch;
pub mod cache;
pub mod calendar;
pub mod events;
pub mod form;
pub mod manager;
pub mod model;
pub mod store;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{DeleteOutcome, GetOverridesOutcome, UpsertOutcome};
pub use form::OverrideFormData;
pub use manager::OverrideManager;
pub use model::{OverrideData, OverrideRecord, OverrideScope, QuizOverride};
pub use validate::OverrideViolation;
