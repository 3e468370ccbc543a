//! Capability identifiers and the authorization seam.

use std::fmt;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;

/// Capabilities the override engine checks before acting.
///
/// How capabilities are granted (roles, enrolments, site admin flags) is the
/// host application's concern; the engine only asks yes/no questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// View the overrides of a quiz.
    ReadOverrides,
    /// Create, update or delete overrides.
    ManageOverrides,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ReadOverrides => write!(f, "read overrides"),
            Capability::ManageOverrides => write!(f, "manage overrides"),
        }
    }
}

/// Authorization decisions, keyed by actor and course context.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Whether `actor` holds `capability` within the course `course_id`.
    async fn allows(
        &self,
        actor: DbId,
        course_id: DbId,
        capability: Capability,
    ) -> Result<bool, CoreError>;
}
