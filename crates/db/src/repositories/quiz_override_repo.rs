//! Repository for the `quiz_overrides` table.

use sqlx::PgPool;

use edra_core::quiz::OverridableSettings;
use edra_core::types::DbId;

use crate::models::quiz_override::QuizOverrideRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, quiz_id, user_id, group_id, time_open, time_close, time_limit, \
    attempts, password, created_at, updated_at";

/// Provides CRUD operations for quiz overrides.
///
/// Scope columns are passed as an `(Option, Option)` pair at this layer;
/// the `quiz_overrides_one_scope` check constraint and the partial unique
/// indexes guard the invariants even against callers that bypass the
/// validation pipeline.
pub struct QuizOverrideRepo;

impl QuizOverrideRepo {
    /// Find an override by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<QuizOverrideRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quiz_overrides WHERE id = $1");
        sqlx::query_as::<_, QuizOverrideRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All overrides of a quiz in insertion order.
    pub async fn list_for_quiz(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Vec<QuizOverrideRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quiz_overrides WHERE quiz_id = $1 ORDER BY id");
        sqlx::query_as::<_, QuizOverrideRow>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
    }

    /// The override for one exact (quiz, user, group) scope, if any.
    pub async fn find_for_scope(
        pool: &PgPool,
        quiz_id: DbId,
        user_id: Option<DbId>,
        group_id: Option<DbId>,
    ) -> Result<Option<QuizOverrideRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_overrides \
             WHERE quiz_id = $1 \
               AND user_id IS NOT DISTINCT FROM $2 \
               AND group_id IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, QuizOverrideRow>(&query)
            .bind(quiz_id)
            .bind(user_id)
            .bind(group_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an override exists for this scope, optionally excluding one
    /// record id (the record being updated).
    pub async fn exists_for_scope(
        pool: &PgPool,
        quiz_id: DbId,
        user_id: Option<DbId>,
        group_id: Option<DbId>,
        excluding: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM quiz_overrides \
                WHERE quiz_id = $1 \
                  AND user_id IS NOT DISTINCT FROM $2 \
                  AND group_id IS NOT DISTINCT FROM $3 \
                  AND ($4::bigint IS NULL OR id <> $4))",
        )
        .bind(quiz_id)
        .bind(user_id)
        .bind(group_id)
        .bind(excluding)
        .fetch_one(pool)
        .await
    }

    /// Insert a new override, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        quiz_id: DbId,
        user_id: Option<DbId>,
        group_id: Option<DbId>,
        settings: &OverridableSettings,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO quiz_overrides \
                (quiz_id, user_id, group_id, time_open, time_close, time_limit, attempts, password) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(quiz_id)
        .bind(user_id)
        .bind(group_id)
        .bind(settings.time_open)
        .bind(settings.time_close)
        .bind(settings.time_limit)
        .bind(settings.attempts)
        .bind(&settings.password)
        .fetch_one(pool)
        .await
    }

    /// Replace the setting columns of an existing override.
    ///
    /// The scope columns are deliberately not touched. Returns the number
    /// of affected rows.
    pub async fn update_settings(
        pool: &PgPool,
        id: DbId,
        settings: &OverridableSettings,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE quiz_overrides SET \
                time_open = $2, \
                time_close = $3, \
                time_limit = $4, \
                attempts = $5, \
                password = $6, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(settings.time_open)
        .bind(settings.time_close)
        .bind(settings.time_limit)
        .bind(settings.attempts)
        .bind(&settings.password)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete one override. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quiz_overrides WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all overrides of a quiz in one statement, returning the
    /// number of rows removed.
    pub async fn delete_all_for_quiz(pool: &PgPool, quiz_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quiz_overrides WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
