//! Postgres implementations of the override engine's collaborator seams.
//!
//! Each adapter owns a pool clone and delegates to the stateless
//! repositories, translating between row models and the core domain types.

use std::sync::Arc;

use async_trait::async_trait;

use edra_core::capability::{AccessPolicy, Capability};
use edra_core::directory::{GroupRef, MemberDirectory};
use edra_core::error::CoreError;
use edra_core::overrides::cache::OverrideCache;
use edra_core::overrides::calendar::CalendarSync;
use edra_core::overrides::events::EventSink;
use edra_core::overrides::manager::OverrideManager;
use edra_core::overrides::model::{OverrideScope, QuizOverride};
use edra_core::overrides::store::OverrideStore;
use edra_core::overrides::validate::OverrideViolation;
use edra_core::quiz::{OverridableSettings, QuizProvider, QuizSettings};
use edra_core::types::DbId;

use crate::models::calendar_event::derive_scope_events;
use crate::repositories::{
    CalendarEventRepo, DirectoryRepo, QuizOverrideRepo, QuizRepo, RoleRepo,
};
use crate::DbPool;

/// Whether a sqlx error is a Postgres unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

// ---------------------------------------------------------------------------
// Override store
// ---------------------------------------------------------------------------

/// [`OverrideStore`] backed by the `quiz_overrides` table.
pub struct PgOverrideStore {
    pool: DbPool,
}

impl PgOverrideStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OverrideStore for PgOverrideStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<QuizOverride>, CoreError> {
        QuizOverrideRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::store)?
            .map(|row| row.into_domain())
            .transpose()
    }

    async fn list_for_quiz(&self, quiz_id: DbId) -> Result<Vec<QuizOverride>, CoreError> {
        QuizOverrideRepo::list_for_quiz(&self.pool, quiz_id)
            .await
            .map_err(CoreError::store)?
            .into_iter()
            .map(|row| row.into_domain())
            .collect()
    }

    async fn exists_for_scope(
        &self,
        quiz_id: DbId,
        scope: OverrideScope,
        excluding: Option<DbId>,
    ) -> Result<bool, CoreError> {
        QuizOverrideRepo::exists_for_scope(
            &self.pool,
            quiz_id,
            scope.user_id(),
            scope.group_id(),
            excluding,
        )
        .await
        .map_err(CoreError::store)
    }

    async fn insert(
        &self,
        quiz_id: DbId,
        scope: OverrideScope,
        settings: &OverridableSettings,
    ) -> Result<DbId, CoreError> {
        match QuizOverrideRepo::insert(
            &self.pool,
            quiz_id,
            scope.user_id(),
            scope.group_id(),
            settings,
        )
        .await
        {
            Ok(id) => Ok(id),
            // The partial unique indexes are the authoritative guard for
            // the one-override-per-scope rule; a concurrent writer that
            // slipped past the validator's pre-check lands here.
            Err(err) if is_unique_violation(&err) => Err(match scope {
                OverrideScope::User(_) => OverrideViolation::DuplicateForUser.into(),
                OverrideScope::Group(_) => OverrideViolation::DuplicateForGroup.into(),
            }),
            Err(err) => Err(CoreError::store(err)),
        }
    }

    async fn update(&self, id: DbId, settings: &OverridableSettings) -> Result<(), CoreError> {
        let affected = QuizOverrideRepo::update_settings(&self.pool, id, settings)
            .await
            .map_err(CoreError::store)?;

        if affected == 0 {
            return Err(CoreError::NotFound {
                entity: "quiz override",
                id,
            });
        }
        Ok(())
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        QuizOverrideRepo::delete(&self.pool, id)
            .await
            .map_err(CoreError::store)?;
        Ok(())
    }

    async fn delete_all_for_quiz(&self, quiz_id: DbId) -> Result<u64, CoreError> {
        QuizOverrideRepo::delete_all_for_quiz(&self.pool, quiz_id)
            .await
            .map_err(CoreError::store)
    }
}

// ---------------------------------------------------------------------------
// Quiz provider and member directory
// ---------------------------------------------------------------------------

/// [`QuizProvider`] backed by the `quizzes` table.
pub struct PgQuizProvider {
    pool: DbPool,
}

impl PgQuizProvider {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizProvider for PgQuizProvider {
    async fn find_quiz(&self, id: DbId) -> Result<Option<QuizSettings>, CoreError> {
        Ok(QuizRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::store)?
            .map(|row| row.into_settings()))
    }
}

/// [`MemberDirectory`] backed by the `users` and `course_groups` tables.
pub struct PgMemberDirectory {
    pool: DbPool,
}

impl PgMemberDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PgMemberDirectory {
    async fn user_exists(&self, user_id: DbId) -> Result<bool, CoreError> {
        DirectoryRepo::user_exists(&self.pool, user_id)
            .await
            .map_err(CoreError::store)
    }

    async fn find_group(&self, group_id: DbId) -> Result<Option<GroupRef>, CoreError> {
        Ok(DirectoryRepo::find_group(&self.pool, group_id)
            .await
            .map_err(CoreError::store)?
            .map(|row| row.to_ref()))
    }
}

// ---------------------------------------------------------------------------
// Calendar synchronization
// ---------------------------------------------------------------------------

/// [`CalendarSync`] maintaining override-derived rows in `calendar_events`.
///
/// Every operation is delete-and-recreate from current override state, so
/// replaying a sync after a partial failure converges.
pub struct PgCalendarSync {
    pool: DbPool,
}

impl PgCalendarSync {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn recreate_scope(
        &self,
        quiz: &QuizSettings,
        scope: OverrideScope,
    ) -> Result<(), CoreError> {
        CalendarEventRepo::delete_for_scope(
            &self.pool,
            quiz.id,
            scope.user_id(),
            scope.group_id(),
        )
        .await
        .map_err(CoreError::store)?;

        let row = QuizOverrideRepo::find_for_scope(
            &self.pool,
            quiz.id,
            scope.user_id(),
            scope.group_id(),
        )
        .await
        .map_err(CoreError::store)?;

        if let Some(row) = row {
            let record = row.into_domain()?;
            for event in derive_scope_events(quiz, scope, &record.settings) {
                CalendarEventRepo::insert(&self.pool, &event)
                    .await
                    .map_err(CoreError::store)?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CalendarSync for PgCalendarSync {
    async fn sync_scope(&self, quiz: &QuizSettings, scope: OverrideScope) -> Result<(), CoreError> {
        self.recreate_scope(quiz, scope).await
    }

    async fn sync_all(&self, quiz: &QuizSettings) -> Result<(), CoreError> {
        CalendarEventRepo::delete_scoped_for_quiz(&self.pool, quiz.id)
            .await
            .map_err(CoreError::store)?;

        let rows = QuizOverrideRepo::list_for_quiz(&self.pool, quiz.id)
            .await
            .map_err(CoreError::store)?;

        let mut inserted = 0usize;
        for row in rows {
            let record = row.into_domain()?;
            for event in derive_scope_events(quiz, record.scope, &record.settings) {
                CalendarEventRepo::insert(&self.pool, &event)
                    .await
                    .map_err(CoreError::store)?;
                inserted += 1;
            }
        }

        tracing::debug!(quiz_id = quiz.id, inserted, "recomputed quiz calendar entries");
        Ok(())
    }

    async fn remove_scope(&self, quiz_id: DbId, scope: OverrideScope) -> Result<(), CoreError> {
        CalendarEventRepo::delete_for_scope(&self.pool, quiz_id, scope.user_id(), scope.group_id())
            .await
            .map_err(CoreError::store)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Access policy
// ---------------------------------------------------------------------------

/// Roles granting the manage-overrides capability.
const MANAGE_ROLES: &[&str] = &["manager", "editingteacher"];

/// Roles granting the read-overrides capability.
const READ_ROLES: &[&str] = &["manager", "editingteacher", "teacher"];

/// [`AccessPolicy`] backed by the `role_assignments` table.
pub struct PgAccessPolicy {
    pool: DbPool,
}

impl PgAccessPolicy {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessPolicy for PgAccessPolicy {
    async fn allows(
        &self,
        actor: DbId,
        course_id: DbId,
        capability: Capability,
    ) -> Result<bool, CoreError> {
        let roles = match capability {
            Capability::ReadOverrides => READ_ROLES,
            Capability::ManageOverrides => MANAGE_ROLES,
        };

        RoleRepo::user_has_any_role(&self.pool, actor, course_id, roles)
            .await
            .map_err(CoreError::store)
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Wire an [`OverrideManager`] against Postgres.
///
/// The cache and event sink stay injectable because their backends differ
/// per deployment (in-process cache and bus by default).
pub fn manager_from_pool(
    pool: &DbPool,
    cache: Arc<dyn OverrideCache>,
    events: Arc<dyn EventSink>,
) -> OverrideManager {
    OverrideManager::new(
        Arc::new(PgOverrideStore::new(pool.clone())),
        Arc::new(PgQuizProvider::new(pool.clone())),
        Arc::new(PgMemberDirectory::new(pool.clone())),
        cache,
        Arc::new(PgCalendarSync::new(pool.clone())),
        Arc::new(PgAccessPolicy::new(pool.clone())),
        events,
    )
}
