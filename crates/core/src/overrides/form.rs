//! Wire-shaped form data for override upserts.

use serde::{Deserialize, Serialize};

use crate::quiz::{OverridableSettings, QuizSettings};
use crate::types::DbId;

use super::model::OverrideData;

/// One submitted override, as received from a form or remote caller.
///
/// Field names match the legacy wire contract. All numeric fields use `0`
/// as "not set" in addition to being omittable; both spellings land as
/// unset. `quizid` is required but optional in the type so batch callers
/// can report its absence as a per-item error instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFormData {
    /// Existing override id when updating.
    pub id: Option<DbId>,
    pub quizid: Option<DbId>,
    pub userid: Option<DbId>,
    pub groupid: Option<DbId>,
    /// Open timestamp, unix epoch seconds.
    pub timeopen: Option<i64>,
    /// Close timestamp, unix epoch seconds.
    pub timeclose: Option<i64>,
    /// Time limit in seconds.
    pub timelimit: Option<i64>,
    pub attempts: Option<i32>,
    pub password: Option<String>,
}

impl OverrideFormData {
    /// Build the normalized candidate for validation and persistence.
    ///
    /// Only the recognized setting and scope fields survive; empty values
    /// are coerced to unset, and when the parent quiz is known every value
    /// equal to the parent's current setting is cleared. When the parent is
    /// unknown the settings are kept as coerced so the validator can still
    /// report the empty-submission rule before the unknown-quiz rule.
    pub fn candidate(&self, quiz_id: DbId, parent: Option<&QuizSettings>) -> OverrideData {
        let mut settings = OverridableSettings::coerced(
            self.timeopen,
            self.timeclose,
            self.timelimit,
            self.attempts,
            self.password.clone(),
        );

        if let Some(parent) = parent {
            settings = settings.normalized_against(&parent.settings);
        }

        OverrideData {
            id: self.id,
            quiz_id,
            user_id: self.userid,
            group_id: self.groupid,
            settings,
        }
    }
}
