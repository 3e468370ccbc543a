//! Course group row model.

use serde::Serialize;
use sqlx::FromRow;

use edra_core::directory::GroupRef;
use edra_core::types::{DbId, Timestamp};

/// A row from the `course_groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupRow {
    pub id: DbId,
    pub course_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

impl GroupRow {
    /// The narrow reference consumed by the override engine.
    pub fn to_ref(&self) -> GroupRef {
        GroupRef {
            id: self.id,
            course_id: self.course_id,
        }
    }
}
