//! Gantt chart layout for a project's milestones.

use serde::Serialize;

use crate::milestone::{duration_days, is_overdue, MilestoneStatus};
use crate::types::{Date, DbId};

/// A milestone as loaded for the chart.
#[derive(Debug, Clone)]
pub struct GanttInput {
    pub id: DbId,
    pub name: String,
    pub status: MilestoneStatus,
    pub start_date: Date,
    pub due_date: Date,
    pub duration: i64,
    pub dependency_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttRow {
    pub id: DbId,
    pub name: String,
    pub status: MilestoneStatus,
    pub start_date: Date,
    pub due_date: Date,
    pub duration: i64,
    /// Days between the project start and this milestone's start.
    pub offset_days: i64,
    /// Horizontal position as a percentage of the project span.
    pub left_pct: f64,
    /// Bar width as a percentage of the project span.
    pub width_pct: f64,
    pub is_overdue: bool,
    pub dependency_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttChart {
    pub start_date: Date,
    pub end_date: Date,
    pub total_days: i64,
    pub rows: Vec<GanttRow>,
}

fn pct(part: i64, whole: i64) -> f64 {
    (part as f64 * 10_000.0 / whole as f64).round() / 100.0
}

/// Lay out milestones across the project's inclusive date span.
///
/// Rows are ordered by start date, then due date, then id.
pub fn build_chart(
    project_start: Date,
    project_end: Date,
    mut milestones: Vec<GanttInput>,
    today: Date,
) -> GanttChart {
    let total_days = duration_days(project_start, project_end).max(1);

    milestones.sort_by_key(|m| (m.start_date, m.due_date, m.id));

    let rows = milestones
        .into_iter()
        .map(|m| {
            let offset_days = (m.start_date - project_start).num_days();
            GanttRow {
                left_pct: pct(offset_days, total_days),
                width_pct: pct(m.duration, total_days),
                is_overdue: is_overdue(m.due_date, m.status, today),
                offset_days,
                id: m.id,
                name: m.name,
                status: m.status,
                start_date: m.start_date,
                due_date: m.due_date,
                duration: m.duration,
                dependency_ids: m.dependency_ids,
            }
        })
        .collect();

    GanttChart {
        start_date: project_start,
        end_date: project_end,
        total_days,
        rows,
    }
}
