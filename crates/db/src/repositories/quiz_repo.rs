//! Repository for the `quizzes` table.

use sqlx::PgPool;

use edra_core::types::DbId;

use crate::models::quiz::QuizRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, course_id, name, time_open, time_close, time_limit, \
    attempts, password, created_at, updated_at";

/// Provides read access to quizzes.
///
/// The override engine never writes quizzes; quiz authoring lives
/// elsewhere in the application.
pub struct QuizRepo;

impl QuizRepo {
    /// Find a quiz by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QuizRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1");
        sqlx::query_as::<_, QuizRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
