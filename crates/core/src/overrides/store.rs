//! The override persistence seam.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::quiz::OverridableSettings;
use crate::types::DbId;

use super::model::{OverrideScope, QuizOverride};

/// Persistence operations the override engine needs.
///
/// The engine owns the write path exclusively; readers elsewhere in the
/// application go through their own caches. Implementations must enforce
/// the one-override-per-(quiz, scope) invariant with a storage-level
/// uniqueness constraint and surface a violation of it as
/// [`CoreError::Validation`] with the matching duplicate rule, because the
/// validator's own duplicate check is an optimistic pre-check that two
/// concurrent writers can both pass.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Load one override by id.
    async fn find_by_id(&self, id: DbId) -> Result<Option<QuizOverride>, CoreError>;

    /// All overrides of a quiz, in natural storage order.
    async fn list_for_quiz(&self, quiz_id: DbId) -> Result<Vec<QuizOverride>, CoreError>;

    /// Whether an override exists for this scope, optionally excluding one
    /// record id (the record being updated).
    async fn exists_for_scope(
        &self,
        quiz_id: DbId,
        scope: OverrideScope,
        excluding: Option<DbId>,
    ) -> Result<bool, CoreError>;

    /// Insert a new override and return its id.
    async fn insert(
        &self,
        quiz_id: DbId,
        scope: OverrideScope,
        settings: &OverridableSettings,
    ) -> Result<DbId, CoreError>;

    /// Replace the settings of an existing override.
    ///
    /// The scope is deliberately not a parameter: record identity and scope
    /// are immutable once created.
    async fn update(&self, id: DbId, settings: &OverridableSettings) -> Result<(), CoreError>;

    /// Delete one override.
    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    /// Delete every override of a quiz in one atomic operation, returning
    /// the number of removed records.
    async fn delete_all_for_quiz(&self, quiz_id: DbId) -> Result<u64, CoreError>;
}
