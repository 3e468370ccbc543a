//! Repository for the `calendar_events` table.

use sqlx::PgPool;

use edra_core::types::DbId;

use crate::models::calendar_event::{CalendarEventRow, NewCalendarEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quiz_id, user_id, group_id, name, event_kind, event_time, created_at";

/// Provides data access for quiz calendar entries.
pub struct CalendarEventRepo;

impl CalendarEventRepo {
    /// All entries of a quiz ordered by time.
    pub async fn list_for_quiz(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Vec<CalendarEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events WHERE quiz_id = $1 ORDER BY event_time, id"
        );
        sqlx::query_as::<_, CalendarEventRow>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
    }

    /// Delete the entries keyed by one exact (quiz, user, group) scope.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_for_scope(
        pool: &PgPool,
        quiz_id: DbId,
        user_id: Option<DbId>,
        group_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM calendar_events \
             WHERE quiz_id = $1 \
               AND user_id IS NOT DISTINCT FROM $2 \
               AND group_id IS NOT DISTINCT FROM $3",
        )
        .bind(quiz_id)
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete every override-derived entry of a quiz (entries carrying a
    /// user or group scope). Scope-less default entries are untouched.
    pub async fn delete_scoped_for_quiz(pool: &PgPool, quiz_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM calendar_events \
             WHERE quiz_id = $1 AND (user_id IS NOT NULL OR group_id IS NOT NULL)",
        )
        .bind(quiz_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Insert one entry, returning the generated ID.
    pub async fn insert(pool: &PgPool, event: &NewCalendarEvent) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO calendar_events \
                (quiz_id, user_id, group_id, name, event_kind, event_time) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(event.quiz_id)
        .bind(event.user_id)
        .bind(event.group_id)
        .bind(&event.name)
        .bind(event.event_kind)
        .bind(event.event_time)
        .fetch_one(pool)
        .await
    }
}
