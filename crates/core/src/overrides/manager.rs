//! Orchestration of override writes and their side effects.

use std::sync::Arc;

use crate::capability::{AccessPolicy, Capability};
use crate::directory::MemberDirectory;
use crate::error::CoreError;
use crate::quiz::QuizProvider;
use crate::types::DbId;

use super::cache::{scope_cache_key, OverrideCache};
use super::calendar::CalendarSync;
use super::events::{EventSink, OverrideEvent, OverrideEventKind};
use super::form::OverrideFormData;
use super::model::{OverrideScope, QuizOverride};
use super::store::OverrideStore;
use super::validate::{validate, OverrideViolation, ValidationContext};

/// The single entry point for mutating quiz overrides.
///
/// Every collaborator arrives at construction, so the manager can be wired
/// against Postgres in production and in-memory fakes in tests without any
/// ambient state. Side effects of a successful write run in a fixed order:
/// persistence, cache invalidation, audit event, calendar sync. The cache
/// is invalidated before the event fires so a listener that re-reads on
/// the event observes fresh state. Cache and calendar are not transactional
/// with the write; both tolerate replays, so a crash in between leaves at
/// worst a stale entry that the next recompute or lazy read repairs.
pub struct OverrideManager {
    store: Arc<dyn OverrideStore>,
    quizzes: Arc<dyn QuizProvider>,
    directory: Arc<dyn MemberDirectory>,
    cache: Arc<dyn OverrideCache>,
    calendar: Arc<dyn CalendarSync>,
    access: Arc<dyn AccessPolicy>,
    events: Arc<dyn EventSink>,
}

impl OverrideManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn OverrideStore>,
        quizzes: Arc<dyn QuizProvider>,
        directory: Arc<dyn MemberDirectory>,
        cache: Arc<dyn OverrideCache>,
        calendar: Arc<dyn CalendarSync>,
        access: Arc<dyn AccessPolicy>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            quizzes,
            directory,
            cache,
            calendar,
            access,
            events,
        }
    }

    /// Create or update one override from submitted form data.
    ///
    /// Returns the persisted id. Fails with [`CoreError::Validation`] when
    /// any business rule rejects the candidate, with [`CoreError::NotFound`]
    /// when an id is given but no such override exists, and with
    /// [`CoreError::Forbidden`] when the actor may not manage overrides in
    /// the quiz's course.
    pub async fn upsert_override(
        &self,
        actor: DbId,
        form: &OverrideFormData,
    ) -> Result<DbId, CoreError> {
        let quiz_id = form.quizid.ok_or(OverrideViolation::MissingQuiz)?;

        // Resolve the parent first: it is both the normalization input and
        // the authorization context. A missing parent is reported by the
        // validator in rule order, after the empty-submission check.
        let parent = self.quizzes.find_quiz(quiz_id).await?;
        if let Some(parent) = &parent {
            self.require(actor, parent.course_id, Capability::ManageOverrides)
                .await?;
        }

        let candidate = form.candidate(quiz_id, parent.as_ref());

        let existing = match candidate.id {
            Some(id) => self.store.find_by_id(id).await?,
            None => None,
        };

        let (user_exists, group) = match candidate.scope() {
            Some(OverrideScope::User(user_id)) => {
                (self.directory.user_exists(user_id).await?, None)
            }
            Some(OverrideScope::Group(group_id)) => {
                (false, self.directory.find_group(group_id).await?)
            }
            None => (false, None),
        };

        let duplicate_exists = match candidate.scope() {
            Some(scope) => {
                self.store
                    .exists_for_scope(quiz_id, scope, candidate.id)
                    .await?
            }
            None => false,
        };

        let ctx = ValidationContext {
            parent: parent.as_ref(),
            user_exists,
            group,
            duplicate_exists,
            existing: existing.as_ref(),
        };

        if let Err(violation) = validate(&candidate, &ctx) {
            // An unknown id is a lookup failure, not a rule failure.
            if violation == OverrideViolation::UnknownOverride {
                return Err(CoreError::NotFound {
                    entity: "quiz override",
                    id: candidate.id.unwrap_or_default(),
                });
            }
            return Err(violation.into());
        }

        // The validator guarantees both of these on success.
        let parent = parent.ok_or(OverrideViolation::InvalidQuiz)?;
        let scope = candidate
            .scope()
            .ok_or(OverrideViolation::MissingUserAndGroup)?;

        let (id, kind) = match candidate.id {
            Some(id) => {
                self.store.update(id, &candidate.settings).await?;
                (id, OverrideEventKind::Updated)
            }
            None => {
                let id = self
                    .store
                    .insert(quiz_id, scope, &candidate.settings)
                    .await?;
                (id, OverrideEventKind::Created)
            }
        };

        self.cache.delete(&scope_cache_key(quiz_id, scope)).await;

        self.events.publish(OverrideEvent {
            kind,
            override_id: id,
            quiz_id,
            scope,
            actor,
        });

        // A group override can change the calendar visibility of many
        // users at once; a user override affects exactly one entry.
        match scope {
            OverrideScope::Group(_) => self.calendar.sync_all(&parent).await?,
            OverrideScope::User(_) => self.calendar.sync_scope(&parent, scope).await?,
        }

        tracing::info!(
            override_id = id,
            quiz_id,
            scope = scope.kind_str(),
            member_id = scope.member_id(),
            action = kind.as_str(),
            "quiz override written"
        );

        Ok(id)
    }

    /// All overrides of one quiz, in natural storage order.
    pub async fn get_all_overrides(
        &self,
        actor: DbId,
        quiz_id: DbId,
    ) -> Result<Vec<QuizOverride>, CoreError> {
        let quiz = self
            .quizzes
            .find_quiz(quiz_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "quiz",
                id: quiz_id,
            })?;

        self.require(actor, quiz.course_id, Capability::ReadOverrides)
            .await?;

        self.store.list_for_quiz(quiz_id).await
    }

    /// Delete one override with full side-effect cleanup and audit event.
    pub async fn delete_override(&self, actor: DbId, id: DbId) -> Result<(), CoreError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "quiz override",
                id,
            })?;

        let quiz = self
            .quizzes
            .find_quiz(record.quiz_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "quiz",
                id: record.quiz_id,
            })?;

        self.require(actor, quiz.course_id, Capability::ManageOverrides)
            .await?;

        self.remove_record(actor, &record, true).await
    }

    /// Delete every override of a quiz, returning the number removed.
    ///
    /// The record deletion itself is one atomic store operation; cache and
    /// calendar cleanup then run per record, and the per-record audit
    /// events are suppressed so a bulk purge does not flood listeners.
    pub async fn delete_all_overrides(&self, actor: DbId, quiz_id: DbId) -> Result<u64, CoreError> {
        let quiz = self
            .quizzes
            .find_quiz(quiz_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "quiz",
                id: quiz_id,
            })?;

        self.require(actor, quiz.course_id, Capability::ManageOverrides)
            .await?;

        let records = self.store.list_for_quiz(quiz_id).await?;
        let removed = self.store.delete_all_for_quiz(quiz_id).await?;

        for record in &records {
            self.calendar.remove_scope(quiz_id, record.scope).await?;
            self.cache
                .delete(&scope_cache_key(quiz_id, record.scope))
                .await;
        }

        tracing::info!(quiz_id, removed, "deleted all quiz overrides");

        Ok(removed)
    }

    /// Shared teardown for single and bulk deletion.
    async fn remove_record(
        &self,
        actor: DbId,
        record: &QuizOverride,
        emit_event: bool,
    ) -> Result<(), CoreError> {
        self.calendar
            .remove_scope(record.quiz_id, record.scope)
            .await?;

        self.store.delete(record.id).await?;

        self.cache
            .delete(&scope_cache_key(record.quiz_id, record.scope))
            .await;

        if emit_event {
            self.events.publish(OverrideEvent {
                kind: OverrideEventKind::Deleted,
                override_id: record.id,
                quiz_id: record.quiz_id,
                scope: record.scope,
                actor,
            });
        }

        tracing::info!(
            override_id = record.id,
            quiz_id = record.quiz_id,
            scope = record.scope.kind_str(),
            member_id = record.scope.member_id(),
            "quiz override deleted"
        );

        Ok(())
    }

    async fn require(
        &self,
        actor: DbId,
        course_id: DbId,
        capability: Capability,
    ) -> Result<(), CoreError> {
        if self.access.allows(actor, course_id, capability).await? {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "user {actor} may not {capability} in course {course_id}"
            )))
        }
    }
}
