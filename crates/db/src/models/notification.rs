//! Notification entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use timeline_core::notification::NotificationType;
use timeline_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub notification_type: String,
    pub project_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub notification_type: NotificationType,
    pub project_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
    pub message: String,
}
