//! Audit event types emitted by the override engine.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

use super::model::OverrideScope;

/// What happened to an override record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideEventKind {
    Created,
    Updated,
    Deleted,
}

impl OverrideEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideEventKind::Created => "created",
            OverrideEventKind::Updated => "updated",
            OverrideEventKind::Deleted => "deleted",
        }
    }
}

/// One audit notification about an override write.
///
/// A single tagged type covers all six legacy event classes (user/group
/// crossed with created/updated/deleted); the scope carries the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEvent {
    pub kind: OverrideEventKind,
    pub override_id: DbId,
    pub quiz_id: DbId,
    pub scope: OverrideScope,
    /// The user who performed the write.
    pub actor: DbId,
}

impl OverrideEvent {
    /// Dot-separated event name, e.g. `"quiz_override.user.created"`.
    pub fn event_type(&self) -> String {
        format!("quiz_override.{}.{}", self.scope.kind_str(), self.kind.as_str())
    }
}

/// Fire-and-forget event delivery.
///
/// The data write is the source of truth; event delivery is best effort
/// and a delivery fault never fails the operation that emitted it, which
/// is why `publish` is infallible.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: OverrideEvent);
}
