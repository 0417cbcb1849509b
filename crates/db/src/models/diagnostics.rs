//! Rows loaded by the integrity checks.

use sqlx::FromRow;
use timeline_core::types::{Date, DbId};

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRangeRow {
    pub id: DbId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Clone, FromRow)]
pub struct MilestoneRecordRow {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub start_date: Date,
    pub due_date: Date,
    pub duration: i64,
}
