//! Repository for the `role_assignments` table.

use sqlx::PgPool;

use edra_core::types::DbId;

/// Role assignment lookups.
pub struct RoleRepo;

impl RoleRepo {
    /// Whether the user holds any of the given roles within the course.
    pub async fn user_has_any_role(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        roles: &[&str],
    ) -> Result<bool, sqlx::Error> {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM role_assignments \
                WHERE user_id = $1 AND course_id = $2 AND role = ANY($3))",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(&roles)
        .fetch_one(pool)
        .await
    }
}
