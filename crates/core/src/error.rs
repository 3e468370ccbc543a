//! Error taxonomy shared across the workspace crates.

use crate::overrides::validate::OverrideViolation;
use crate::types::DbId;

/// The top-level error type returned by the override engine and the
/// collaborator seams it drives.
///
/// Batch callers map these per item into result rows; single-item callers
/// match on the variant directly.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A business rule rejected the submitted override.
    #[error("invalid override: {0}")]
    Validation(#[from] OverrideViolation),

    /// The acting user lacks a required capability.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The storage backend failed. Carries the backend message verbatim.
    #[error("storage backend error: {0}")]
    Store(String),
}

impl CoreError {
    /// Shorthand used by store implementations wrapping backend faults.
    pub fn store(err: impl std::fmt::Display) -> Self {
        CoreError::Store(err.to_string())
    }
}
