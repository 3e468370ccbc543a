//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PlatformEvent`]s and is
//! shared via `Arc<EventBus>` across the application. It also implements
//! the override engine's [`EventSink`] seam, wrapping every
//! [`OverrideEvent`] into the platform envelope before fan-out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use edra_core::overrides::events::{EventSink, OverrideEvent};
use edra_core::types::DbId;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"quiz_override.user.created"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"quiz_override"`).
    pub source_entity_type: Option<String>,

    /// Optional source entity database id.
    pub source_entity_id: Option<DbId>,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

impl From<OverrideEvent> for PlatformEvent {
    /// Wrap an override audit event into the platform envelope.
    ///
    /// The scope lands in the payload under its own kind, so `user_id` and
    /// `group_id` are mutually exclusive there, exactly as on the record.
    fn from(event: OverrideEvent) -> Self {
        let payload = serde_json::json!({
            "quiz_id": event.quiz_id,
            "user_id": event.scope.user_id(),
            "group_id": event.scope.group_id(),
        });

        PlatformEvent::new(event.event_type())
            .with_source("quiz_override", event.override_id)
            .with_actor(event.actor)
            .with_payload(payload)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`PlatformEvent`].
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: PlatformEvent) {
        // The SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: OverrideEvent) {
        EventBus::publish(self, event.into());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use edra_core::overrides::events::OverrideEventKind;
    use edra_core::overrides::model::OverrideScope;

    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = PlatformEvent::new("quiz.created")
            .with_source("quiz", 42)
            .with_actor(7)
            .with_payload(serde_json::json!({"key": "value"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "quiz.created");
        assert_eq!(received.source_entity_type.as_deref(), Some("quiz"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["key"], "value");
    }

    #[tokio::test]
    async fn override_events_are_wrapped_into_the_envelope() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        EventSink::publish(
            &bus,
            OverrideEvent {
                kind: OverrideEventKind::Updated,
                override_id: 9,
                quiz_id: 100,
                scope: OverrideScope::Group(5),
                actor: 1,
            },
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "quiz_override.group.updated");
        assert_eq!(received.source_entity_type.as_deref(), Some("quiz_override"));
        assert_eq!(received.source_entity_id, Some(9));
        assert_eq!(received.actor_user_id, Some(1));
        assert_eq!(received.payload["quiz_id"], 100);
        assert_eq!(received.payload["group_id"], 5);
        assert!(received.payload["user_id"].is_null());
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new("multi.test"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, "multi.test");
        assert_eq!(e2.event_type, "multi.test");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new("orphan.event"));
    }
}
