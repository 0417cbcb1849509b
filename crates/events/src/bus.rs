//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`TimelineEvent`]s. It is
//! shared via `Arc<EventBus>` between the HTTP handlers, the due sweep and
//! the email notifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use timeline_core::types::DbId;

/// A project was shared with a user.
pub const EVENT_PROJECT_SHARED: &str = "project.shared";

/// A milestone was added to a project.
pub const EVENT_MILESTONE_ADDED: &str = "milestone.added";

/// A milestone entered the reminder window.
pub const EVENT_MILESTONE_DUE: &str = "milestone.due";

// ---------------------------------------------------------------------------
// TimelineEvent
// ---------------------------------------------------------------------------

/// A domain event.
///
/// Constructed via [`TimelineEvent::new`] and enriched with the builder
/// methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Dot-separated event name, e.g. `"project.shared"`.
    pub event_type: String,

    pub project_id: Option<DbId>,

    pub milestone_id: Option<DbId>,

    /// Id of the user that triggered the event, if any.
    pub actor_user_id: Option<DbId>,

    /// Id of the user the event is addressed to, if any.
    pub recipient_user_id: Option<DbId>,

    /// Human-readable summary, reused as the email body.
    pub message: String,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl TimelineEvent {
    /// Create a new event with only the required `event_type` and message.
    pub fn new(event_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            project_id: None,
            milestone_id: None,
            actor_user_id: None,
            recipient_user_id: None,
            message: message.into(),
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_project(mut self, project_id: DbId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_milestone(mut self, milestone_id: DbId) -> Self {
        self.milestone_id = Some(milestone_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_recipient(mut self, user_id: DbId) -> Self {
        self.recipient_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of [`TimelineEvent`]s to every live subscriber.
///
/// Subscribers that fall more than the channel capacity behind see
/// `RecvError::Lagged` and miss the overwritten events.
pub struct EventBus {
    sender: broadcast::Sender<TimelineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to current subscribers and return how many received it.
    /// Zero subscribers is not an error.
    pub fn publish(&self, event: TimelineEvent) -> usize {
        let event_type = event.event_type.clone();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(%event_type, delivered, "Event published");
        delivered
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
