//! Shared primitive type aliases.

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All row timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Quiz open/close instants travel as unix epoch seconds, matching the wire
/// format. Zero means "not set" and is coerced to `None` at the boundary.
pub type EpochSeconds = i64;
