//! Calendar event row model and entry derivation.

use serde::Serialize;
use sqlx::FromRow;

use edra_core::overrides::model::OverrideScope;
use edra_core::quiz::{OverridableSettings, QuizSettings};
use edra_core::types::{DbId, Timestamp};

/// Entry kind for a quiz opening.
pub const KIND_OPEN: &str = "open";

/// Entry kind for a quiz closing.
pub const KIND_CLOSE: &str = "close";

/// A row from the `calendar_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEventRow {
    pub id: DbId,
    pub quiz_id: DbId,
    pub user_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub name: String,
    pub event_kind: String,
    /// Unix epoch seconds.
    pub event_time: i64,
    pub created_at: Timestamp,
}

/// An entry about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub quiz_id: DbId,
    pub user_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub name: String,
    pub event_kind: &'static str,
    pub event_time: i64,
}

/// Derive the calendar entries one scope should see for its override.
///
/// Only the times the override itself changes produce entries; a scope
/// without overridden times falls back to the quiz's default entries,
/// which are owned by the calendar subsystem, not by this engine.
/// Recomputation is a pure function of current state, so repeating it
/// after a partial failure converges.
pub fn derive_scope_events(
    quiz: &QuizSettings,
    scope: OverrideScope,
    settings: &OverridableSettings,
) -> Vec<NewCalendarEvent> {
    let mut events = Vec::new();

    if let Some(time_open) = settings.time_open {
        events.push(NewCalendarEvent {
            quiz_id: quiz.id,
            user_id: scope.user_id(),
            group_id: scope.group_id(),
            name: format!("{} (opens)", quiz.name),
            event_kind: KIND_OPEN,
            event_time: time_open,
        });
    }

    if let Some(time_close) = settings.time_close {
        events.push(NewCalendarEvent {
            quiz_id: quiz.id,
            user_id: scope.user_id(),
            group_id: scope.group_id(),
            name: format!("{} (closes)", quiz.name),
            event_kind: KIND_CLOSE,
            event_time: time_close,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> QuizSettings {
        QuizSettings {
            id: 100,
            course_id: 7,
            name: "Week 1 quiz".into(),
            settings: OverridableSettings {
                time_open: Some(1000),
                time_close: Some(2000),
                ..Default::default()
            },
        }
    }

    #[test]
    fn both_times_produce_open_and_close_entries() {
        let settings = OverridableSettings {
            time_open: Some(1500),
            time_close: Some(2500),
            ..Default::default()
        };

        let events = derive_scope_events(&quiz(), OverrideScope::User(42), &settings);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_kind, KIND_OPEN);
        assert_eq!(events[0].event_time, 1500);
        assert_eq!(events[0].user_id, Some(42));
        assert_eq!(events[0].group_id, None);
        assert_eq!(events[1].event_kind, KIND_CLOSE);
        assert_eq!(events[1].event_time, 2500);
        assert_eq!(events[1].name, "Week 1 quiz (closes)");
    }

    #[test]
    fn overrides_without_times_produce_no_entries() {
        let settings = OverridableSettings {
            attempts: Some(5),
            ..Default::default()
        };

        let events = derive_scope_events(&quiz(), OverrideScope::Group(5), &settings);
        assert!(events.is_empty());
    }

    #[test]
    fn group_scope_lands_in_the_group_column() {
        let settings = OverridableSettings {
            time_open: Some(1500),
            ..Default::default()
        };

        let events = derive_scope_events(&quiz(), OverrideScope::Group(5), &settings);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, None);
        assert_eq!(events[0].group_id, Some(5));
    }
}
