//! Calendar synchronization seam.
//!
//! Overridden open and close times surface as calendar entries for the
//! affected user or group. Deriving and rendering those entries is the
//! calendar subsystem's concern; the engine only tells it when to
//! recompute. All operations are idempotent, recomputing from the current
//! override state always converges, so a retry after a partial failure is
//! always safe.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::quiz::QuizSettings;
use crate::types::DbId;

use super::model::OverrideScope;

#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Recompute the entries for one user or group scope of a quiz.
    async fn sync_scope(&self, quiz: &QuizSettings, scope: OverrideScope) -> Result<(), CoreError>;

    /// Recompute every entry of a quiz.
    ///
    /// Used after group-scoped writes, where one override can change the
    /// calendar visibility of many users at once.
    async fn sync_all(&self, quiz: &QuizSettings) -> Result<(), CoreError>;

    /// Remove the entries keyed by (quiz, scope).
    async fn remove_scope(&self, quiz_id: DbId, scope: OverrideScope) -> Result<(), CoreError>;
}
