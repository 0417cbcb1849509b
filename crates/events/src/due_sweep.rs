//! Milestone due-date reminders.
//!
//! [`MilestoneDueSweep`] looks for milestones due within the reminder window
//! and creates a `milestone_due` notification for the project owner and every
//! collaborator. A recipient who still has an unread reminder for the same
//! milestone is skipped, so repeated sweeps do not pile up duplicates.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use timeline_core::notification::{milestone_due_message, NotificationType};
use timeline_db::models::notification::CreateNotification;
use timeline_db::repositories::{CollaboratorRepo, MilestoneRepo, NotificationRepo};
use timeline_db::DbPool;

use crate::bus::{EventBus, TimelineEvent, EVENT_MILESTONE_DUE};

/// Outcome of a single sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Milestones inside the window.
    pub milestones_checked: usize,
    pub notifications_created: usize,
    /// Recipients skipped because an unread reminder already exists.
    pub skipped_existing: usize,
}

pub struct MilestoneDueSweep {
    pool: DbPool,
    event_bus: Arc<EventBus>,
    window_days: i64,
}

impl MilestoneDueSweep {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>, window_days: i64) -> Self {
        Self {
            pool,
            event_bus,
            window_days,
        }
    }

    /// Run the sweep every `interval` until cancelled.
    ///
    /// The first tick fires immediately.
    pub async fn run(&self, interval: Duration, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = interval.as_secs(),
            window_days = self.window_days,
            "Milestone due sweep started"
        );
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Milestone due sweep cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_once(Utc::now().date_naive()).await {
                        Ok(report) if report.notifications_created > 0 => {
                            tracing::info!(
                                checked = report.milestones_checked,
                                created = report.notifications_created,
                                skipped = report.skipped_existing,
                                "Milestone due sweep completed"
                            );
                        }
                        Ok(_) => tracing::debug!("Milestone due sweep found nothing new"),
                        Err(e) => tracing::error!(error = %e, "Milestone due sweep failed"),
                    }
                }
            }
        }
    }

    /// Sweep once as of `today`.
    pub async fn run_once(&self, today: NaiveDate) -> Result<SweepReport, sqlx::Error> {
        let until = today + chrono::Duration::days(self.window_days);
        let due = MilestoneRepo::list_due_between(&self.pool, today, until).await?;

        let mut report = SweepReport {
            milestones_checked: due.len(),
            ..Default::default()
        };

        for milestone in &due {
            let days_left = (milestone.due_date - today).num_days();
            let message = milestone_due_message(&milestone.name, days_left);

            let mut recipients = vec![milestone.owner_id];
            recipients.extend(CollaboratorRepo::user_ids(&self.pool, milestone.project_id).await?);

            for user_id in recipients {
                let created = NotificationRepo::create_unless_unread(
                    &self.pool,
                    &CreateNotification {
                        user_id,
                        notification_type: NotificationType::MilestoneDue,
                        project_id: Some(milestone.project_id),
                        milestone_id: Some(milestone.id),
                        message: message.clone(),
                    },
                )
                .await?;
                if created.is_none() {
                    report.skipped_existing += 1;
                    continue;
                }
                report.notifications_created += 1;

                self.event_bus.publish(
                    TimelineEvent::new(EVENT_MILESTONE_DUE, message.clone())
                        .with_project(milestone.project_id)
                        .with_milestone(milestone.id)
                        .with_recipient(user_id)
                        .with_payload(serde_json::json!({
                            "project_name": milestone.project_name,
                            "milestone_name": milestone.name,
                            "due_date": milestone.due_date,
                            "days_left": days_left,
                        })),
                );
            }
        }

        Ok(report)
    }
}
