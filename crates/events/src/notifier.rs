//! Event-to-email routing.
//!
//! [`EmailNotifier`] subscribes to the event bus and mails addressed events
//! to their recipient. In-app notifications are written by the code that
//! publishes the event, so this loop only handles outbound email.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use timeline_db::repositories::UserRepo;
use timeline_db::DbPool;

use crate::bus::{TimelineEvent, EVENT_MILESTONE_DUE, EVENT_PROJECT_SHARED};
use crate::delivery::email::EmailDelivery;

/// Whether an event type is mailed to its recipient.
pub fn is_emailed(event_type: &str) -> bool {
    matches!(event_type, EVENT_PROJECT_SHARED | EVENT_MILESTONE_DUE)
}

pub struct EmailNotifier {
    pool: DbPool,
    email: EmailDelivery,
}

impl EmailNotifier {
    pub fn new(pool: DbPool, email: EmailDelivery) -> Self {
        Self { pool, email }
    }

    /// Run the routing loop until cancelled or the bus is dropped.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<TimelineEvent>,
        cancel: CancellationToken,
    ) {
        tracing::info!("Email notifier started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Email notifier cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.handle(&event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Email notifier lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, email notifier shutting down");
                        break;
                    }
                },
            }
        }
    }

    /// Deliver one event. Failures are logged, never propagated.
    async fn handle(&self, event: &TimelineEvent) {
        if !is_emailed(&event.event_type) {
            return;
        }
        let Some(recipient_id) = event.recipient_user_id else {
            return;
        };

        let user = match UserRepo::find_by_id(&self.pool, recipient_id).await {
            Ok(Some(user)) if user.is_active => user,
            Ok(_) => return,
            Err(e) => {
                tracing::error!(error = %e, user_id = recipient_id, "Failed to load email recipient");
                return;
            }
        };

        if let Err(e) = self.email.deliver(&user.email, event).await {
            tracing::error!(
                error = %e,
                user_id = recipient_id,
                event_type = %event.event_type,
                "Failed to send notification email"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EVENT_MILESTONE_ADDED;

    #[test]
    fn only_addressed_events_are_emailed() {
        assert!(is_emailed(EVENT_PROJECT_SHARED));
        assert!(is_emailed(EVENT_MILESTONE_DUE));
        assert!(!is_emailed(EVENT_MILESTONE_ADDED));
    }
}
