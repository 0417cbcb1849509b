use std::sync::Arc;

use timeline_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: timeline_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Domain events (shares, new milestones, due reminders) for email delivery.
    pub event_bus: Arc<EventBus>,
}
