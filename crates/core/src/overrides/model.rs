//! Override record model and DTOs.

use serde::{Deserialize, Serialize};

use crate::quiz::OverridableSettings;
use crate::types::{DbId, EpochSeconds};

/// The user or group an override applies to.
///
/// Exactly one variant, and the member identity inside it is immutable once
/// the record exists. Moving an override to another member means deleting
/// and recreating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum OverrideScope {
    User(DbId),
    Group(DbId),
}

impl OverrideScope {
    /// The user id, when this is a user scope.
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            OverrideScope::User(id) => Some(*id),
            OverrideScope::Group(_) => None,
        }
    }

    /// The group id, when this is a group scope.
    pub fn group_id(&self) -> Option<DbId> {
        match self {
            OverrideScope::User(_) => None,
            OverrideScope::Group(id) => Some(*id),
        }
    }

    /// The member id regardless of scope kind.
    pub fn member_id(&self) -> DbId {
        match self {
            OverrideScope::User(id) | OverrideScope::Group(id) => *id,
        }
    }

    /// Scope kind label used in event types and log fields.
    pub fn kind_str(&self) -> &'static str {
        match self {
            OverrideScope::User(_) => "user",
            OverrideScope::Group(_) => "group",
        }
    }
}

/// A persisted override record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOverride {
    pub id: DbId,
    pub quiz_id: DbId,
    pub scope: OverrideScope,
    pub settings: OverridableSettings,
}

impl QuizOverride {
    /// Flatten into the wire record shape returned by the batch surface.
    pub fn to_record(&self) -> OverrideRecord {
        OverrideRecord {
            id: self.id,
            quiz: self.quiz_id,
            userid: self.scope.user_id(),
            groupid: self.scope.group_id(),
            timeopen: self.settings.time_open,
            timeclose: self.settings.time_close,
            timelimit: self.settings.time_limit,
            attempts: self.settings.attempts,
            password: self.settings.password.clone(),
        }
    }
}

/// Flat override record as serialized for remote callers.
///
/// Field names match the legacy wire contract rather than Rust conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub id: DbId,
    pub quiz: DbId,
    pub userid: Option<DbId>,
    pub groupid: Option<DbId>,
    pub timeopen: Option<EpochSeconds>,
    pub timeclose: Option<EpochSeconds>,
    pub timelimit: Option<i64>,
    pub attempts: Option<i32>,
    pub password: Option<String>,
}

/// An unpersisted, normalized override candidate.
///
/// Produced from [`form::OverrideFormData`](super::form::OverrideFormData)
/// by the manager. The scope ids are kept raw (either, both or neither may
/// be present) because scope exclusivity is itself a validated rule, not a
/// parsing precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideData {
    /// Present when updating an existing record.
    pub id: Option<DbId>,
    pub quiz_id: DbId,
    pub user_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub settings: OverridableSettings,
}

impl OverrideData {
    /// The resolved scope, when exactly one scope id is present.
    pub fn scope(&self) -> Option<OverrideScope> {
        match (self.user_id, self.group_id) {
            (Some(user), None) => Some(OverrideScope::User(user)),
            (None, Some(group)) => Some(OverrideScope::Group(group)),
            _ => None,
        }
    }
}
