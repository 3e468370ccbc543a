//! User and group lookups consumed by the override engine.
//!
//! The engine never enumerates accounts or memberships. It only asks
//! whether a user is real and which course a group belongs to, so the seam
//! is deliberately this narrow.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;

/// A reference to an existing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRef {
    pub id: DbId,
    /// Course the group belongs to. Overrides may only target groups in
    /// the same course as their quiz.
    pub course_id: DbId,
}

/// Account and group existence checks.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Whether `user_id` references a real, active account.
    async fn user_exists(&self, user_id: DbId) -> Result<bool, CoreError>;

    /// Look up a group by id. `None` when no such group exists.
    async fn find_group(&self, group_id: DbId) -> Result<Option<GroupRef>, CoreError>;
}
