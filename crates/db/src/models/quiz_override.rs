//! Quiz override row model.

use serde::Serialize;
use sqlx::FromRow;

use edra_core::error::CoreError;
use edra_core::overrides::model::{OverrideScope, QuizOverride};
use edra_core::quiz::OverridableSettings;
use edra_core::types::{DbId, Timestamp};

/// A row from the `quiz_overrides` table.
///
/// `user_id` and `group_id` are nullable columns with a check constraint
/// requiring exactly one of them; the domain conversion turns the pair
/// into the scope enum.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizOverrideRow {
    pub id: DbId,
    pub quiz_id: DbId,
    pub user_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub time_open: Option<i64>,
    pub time_close: Option<i64>,
    pub time_limit: Option<i64>,
    pub attempts: Option<i32>,
    pub password: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QuizOverrideRow {
    /// Convert into the domain record.
    ///
    /// A row violating the single-scope constraint can only appear if the
    /// schema guard was bypassed; it is reported as a storage fault rather
    /// than panicking.
    pub fn into_domain(self) -> Result<QuizOverride, CoreError> {
        let scope = match (self.user_id, self.group_id) {
            (Some(user_id), None) => OverrideScope::User(user_id),
            (None, Some(group_id)) => OverrideScope::Group(group_id),
            _ => {
                return Err(CoreError::Store(format!(
                    "override row {} violates the single-scope constraint",
                    self.id
                )))
            }
        };

        Ok(QuizOverride {
            id: self.id,
            quiz_id: self.quiz_id,
            scope,
            settings: OverridableSettings {
                time_open: self.time_open,
                time_close: self.time_close,
                time_limit: self.time_limit,
                attempts: self.attempts,
                password: self.password,
            },
        })
    }
}
