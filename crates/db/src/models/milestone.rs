//! Milestone entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timeline_core::types::{Date, DbId, Timestamp};

/// A milestone row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub due_date: Date,
    /// Inclusive day count, always derived from the two dates.
    pub duration: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Milestone together with the ids of the milestones it depends on.
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneWithDependencies {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub dependency_ids: Vec<DbId>,
}

/// Request body for creating a milestone.
///
/// `start_date` defaults to `due_date` when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMilestone {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub due_date: Date,
    pub status: Option<String>,
    pub dependency_ids: Option<Vec<DbId>>,
}

/// Request body for updating a milestone. All fields are optional.
///
/// When `dependency_ids` is present it replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMilestone {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: Option<String>,
    pub dependency_ids: Option<Vec<DbId>>,
}

/// Validated column values written on insert and update.
#[derive(Debug, Clone)]
pub struct MilestoneValues {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub due_date: Date,
    pub duration: i64,
    pub status: String,
}

/// A milestone inside the reminder window, joined with its project.
#[derive(Debug, Clone, FromRow)]
pub struct DueMilestone {
    pub id: DbId,
    pub name: String,
    pub due_date: Date,
    pub project_id: DbId,
    pub project_name: String,
    pub owner_id: DbId,
}
