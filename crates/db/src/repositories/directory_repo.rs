//! Repository for the `users` and `course_groups` tables.

use sqlx::PgPool;

use edra_core::types::DbId;

use crate::models::course_group::GroupRow;

/// Column list for `course_groups` queries.
const GROUP_COLUMNS: &str = "id, course_id, name, created_at";

/// Account and group lookups.
///
/// Account management itself lives elsewhere; the override engine only
/// needs existence and course membership answers.
pub struct DirectoryRepo;

impl DirectoryRepo {
    /// Whether a real, non-deleted account with this id exists.
    pub async fn user_exists(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND NOT deleted)")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a group by its internal ID.
    pub async fn find_group(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Option<GroupRow>, sqlx::Error> {
        let query = format!("SELECT {GROUP_COLUMNS} FROM course_groups WHERE id = $1");
        sqlx::query_as::<_, GroupRow>(&query)
            .bind(group_id)
            .fetch_optional(pool)
            .await
    }
}
