//! Quiz entity model.

use serde::Serialize;
use sqlx::FromRow;

use edra_core::quiz::{OverridableSettings, QuizSettings};
use edra_core::types::{DbId, Timestamp};

/// A row from the `quizzes` table.
///
/// The setting columns keep the legacy convention of `0` / empty string
/// meaning "not set" for data imported from older systems; the conversion
/// to the core snapshot collapses those sentinels.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizRow {
    pub id: DbId,
    pub course_id: DbId,
    pub name: String,
    pub time_open: Option<i64>,
    pub time_close: Option<i64>,
    pub time_limit: Option<i64>,
    pub attempts: Option<i32>,
    pub password: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QuizRow {
    /// Produce the settings snapshot consumed by the override engine.
    pub fn into_settings(self) -> QuizSettings {
        QuizSettings {
            id: self.id,
            course_id: self.course_id,
            name: self.name,
            settings: OverridableSettings::coerced(
                self.time_open,
                self.time_close,
                self.time_limit,
                self.attempts,
                self.password,
            ),
        }
    }
}
