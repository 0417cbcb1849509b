//! Flat rows loaded for the analytics summary.

use sqlx::FromRow;
use timeline_core::types::{Date, DbId};

#[derive(Debug, Clone, FromRow)]
pub struct ProjectFactRow {
    pub id: DbId,
    pub name: String,
    pub is_archived: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct MilestoneFactRow {
    pub project_id: DbId,
    pub status: String,
    pub due_date: Date,
}
