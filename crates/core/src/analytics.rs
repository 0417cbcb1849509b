//! Analytics aggregation over a user's projects and milestones.
//!
//! The repository layer loads flat facts; everything here is pure so the
//! numbers can be tested without a database.

use std::collections::HashMap;

use serde::Serialize;

use crate::milestone::{is_overdue, MilestoneStatus};
use crate::types::{Date, DbId};

/// Milestones due within this many days count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// One project visible to the user.
#[derive(Debug, Clone)]
pub struct ProjectFact {
    pub project_id: DbId,
    pub name: String,
    pub is_archived: bool,
}

/// One milestone of a visible project.
#[derive(Debug, Clone)]
pub struct MilestoneFact {
    pub project_id: DbId,
    pub status: MilestoneStatus,
    pub due_date: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub delayed: i64,
}

impl StatusCounts {
    fn record(&mut self, status: MilestoneStatus) {
        match status {
            MilestoneStatus::Pending => self.pending += 1,
            MilestoneStatus::InProgress => self.in_progress += 1,
            MilestoneStatus::Completed => self.completed += 1,
            MilestoneStatus::Delayed => self.delayed += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectProgress {
    pub project_id: DbId,
    pub name: String,
    pub is_archived: bool,
    pub total_milestones: i64,
    pub completed_milestones: i64,
    /// Percentage 0-100, one decimal place.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_projects: i64,
    pub active_projects: i64,
    pub archived_projects: i64,
    pub total_milestones: i64,
    pub status_counts: StatusCounts,
    pub overdue_milestones: i64,
    pub upcoming_milestones: i64,
    /// Percentage 0-100, one decimal place.
    pub completion_rate: f64,
    pub projects: Vec<ProjectProgress>,
}

/// Percentage of `part` in `whole`, rounded to one decimal. Zero when empty.
pub fn completion_rate(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

/// Aggregate project and milestone facts as of `today`.
pub fn summarize(
    projects: &[ProjectFact],
    milestones: &[MilestoneFact],
    today: Date,
) -> AnalyticsSummary {
    let upcoming_end = today + chrono::Duration::days(UPCOMING_WINDOW_DAYS);

    let mut status_counts = StatusCounts::default();
    let mut per_project: HashMap<DbId, (i64, i64)> = HashMap::new();
    let mut overdue = 0;
    let mut upcoming = 0;

    for m in milestones {
        status_counts.record(m.status);

        let entry = per_project.entry(m.project_id).or_default();
        entry.0 += 1;
        if m.status == MilestoneStatus::Completed {
            entry.1 += 1;
        }

        if is_overdue(m.due_date, m.status, today) {
            overdue += 1;
        } else if m.status != MilestoneStatus::Completed
            && m.due_date >= today
            && m.due_date <= upcoming_end
        {
            upcoming += 1;
        }
    }

    let archived = projects.iter().filter(|p| p.is_archived).count() as i64;

    let progress = projects
        .iter()
        .map(|p| {
            let (total, completed) = per_project.get(&p.project_id).copied().unwrap_or((0, 0));
            ProjectProgress {
                project_id: p.project_id,
                name: p.name.clone(),
                is_archived: p.is_archived,
                total_milestones: total,
                completed_milestones: completed,
                completion_rate: completion_rate(completed, total),
            }
        })
        .collect();

    let total_milestones = milestones.len() as i64;

    AnalyticsSummary {
        total_projects: projects.len() as i64,
        active_projects: projects.len() as i64 - archived,
        archived_projects: archived,
        total_milestones,
        overdue_milestones: overdue,
        upcoming_milestones: upcoming,
        completion_rate: completion_rate(status_counts.completed, total_milestones),
        status_counts,
        projects: progress,
    }
}
