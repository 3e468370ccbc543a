//! Parent quiz settings as seen by the override engine.
//!
//! The engine never loads or mutates the quiz itself. It only needs the
//! current values of the settings an override may supersede, plus the owning
//! course for authorization and group membership checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, EpochSeconds};

/// The subset of quiz settings that an override may supersede.
///
/// Every field is optional. `None` means "not set" on the quiz itself and
/// "not overridden" on an override record. Stored overrides only ever hold
/// actual differences from the parent, so a `Some` value here is always
/// meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridableSettings {
    /// When the quiz opens, unix epoch seconds.
    pub time_open: Option<EpochSeconds>,
    /// When the quiz closes, unix epoch seconds.
    pub time_close: Option<EpochSeconds>,
    /// Attempt duration limit in seconds.
    pub time_limit: Option<i64>,
    /// Number of attempts allowed.
    pub attempts: Option<i32>,
    /// Password required to start an attempt.
    pub password: Option<String>,
}

impl OverridableSettings {
    /// Build a settings set from raw wire values, coercing empties to unset.
    ///
    /// The wire format (and the legacy data it mirrors) uses `0` for "no
    /// value" on the integer fields and the empty string for "no password".
    /// Those sentinels never survive past this constructor; negative values
    /// do survive so the validator can reject them explicitly.
    pub fn coerced(
        time_open: Option<i64>,
        time_close: Option<i64>,
        time_limit: Option<i64>,
        attempts: Option<i32>,
        password: Option<String>,
    ) -> Self {
        Self {
            time_open: time_open.filter(|v| *v != 0),
            time_close: time_close.filter(|v| *v != 0),
            time_limit: time_limit.filter(|v| *v != 0),
            attempts: attempts.filter(|v| *v != 0),
            password: password.filter(|p| !p.is_empty()),
        }
    }

    /// Whether no setting is present at all.
    pub fn is_empty(&self) -> bool {
        self.time_open.is_none()
            && self.time_close.is_none()
            && self.time_limit.is_none()
            && self.attempts.is_none()
            && self.password.is_none()
    }

    /// Clear every field whose value equals the parent's current value.
    ///
    /// An override that repeats the parent setting changes nothing, and
    /// storing it would make the "did anything change" check ambiguous, so
    /// such values are normalized to unset before validation.
    pub fn normalized_against(mut self, parent: &OverridableSettings) -> Self {
        if self.time_open.is_some() && self.time_open == parent.time_open {
            self.time_open = None;
        }
        if self.time_close.is_some() && self.time_close == parent.time_close {
            self.time_close = None;
        }
        if self.time_limit.is_some() && self.time_limit == parent.time_limit {
            self.time_limit = None;
        }
        if self.attempts.is_some() && self.attempts == parent.attempts {
            self.attempts = None;
        }
        if self.password.is_some() && self.password == parent.password {
            self.password = None;
        }
        self
    }
}

/// A snapshot of one quiz's identity and current overridable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSettings {
    pub id: DbId,
    /// Owning course, the authorization context for all override operations.
    pub course_id: DbId,
    pub name: String,
    pub settings: OverridableSettings,
}

/// Loads current quiz settings by id.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Returns `None` when no quiz with this id exists.
    async fn find_quiz(&self, id: DbId) -> Result<Option<QuizSettings>, CoreError>;
}
