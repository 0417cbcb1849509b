//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timeline_core::types::{Date, DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub owner_id: DbId,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project as listed on the dashboard or the archive page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectListItem {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub owner_id: DbId,
    pub owner_username: String,
    pub is_archived: bool,
    /// Whether the requesting user owns the project.
    pub is_owner: bool,
    pub milestone_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user who has been granted view access to a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collaborator {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub added_at: Timestamp,
}

/// DTO for creating a new project. The caller becomes the owner.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// Request body for sharing a project by email.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareProject {
    pub email: String,
}
