//! Milestone statuses and schedule reconciliation.
//!
//! A milestone's schedule is `(start_date, due_date, duration)`. Clients only
//! ever send the dates; the duration is derived here so it can never drift
//! from the dates it describes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::project::contains_date;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_DELAYED: &str = "delayed";

/// Lifecycle status of a milestone. Stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl MilestoneStatus {
    /// All statuses in display order.
    pub const ALL: [MilestoneStatus; 4] = [
        MilestoneStatus::Pending,
        MilestoneStatus::InProgress,
        MilestoneStatus::Completed,
        MilestoneStatus::Delayed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneStatus::Pending => STATUS_PENDING,
            MilestoneStatus::InProgress => STATUS_IN_PROGRESS,
            MilestoneStatus::Completed => STATUS_COMPLETED,
            MilestoneStatus::Delayed => STATUS_DELAYED,
        }
    }

    /// Human-readable label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "Pending",
            MilestoneStatus::InProgress => "In Progress",
            MilestoneStatus::Completed => "Completed",
            MilestoneStatus::Delayed => "Delayed",
        }
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(MilestoneStatus::Pending),
            STATUS_IN_PROGRESS => Ok(MilestoneStatus::InProgress),
            STATUS_COMPLETED => Ok(MilestoneStatus::Completed),
            STATUS_DELAYED => Ok(MilestoneStatus::Delayed),
            other => Err(format!(
                "Invalid milestone status '{other}'. Expected one of: pending, in_progress, completed, delayed"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// A reconciled milestone schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start_date: Date,
    pub due_date: Date,
    /// Inclusive length in days.
    pub duration: i64,
}

/// Inclusive number of days from `start_date` through `due_date`.
pub fn duration_days(start_date: Date, due_date: Date) -> i64 {
    (due_date - start_date).num_days() + 1
}

/// Reconcile a requested schedule against the owning project's date range.
///
/// A missing start date collapses the milestone onto its due date. Both dates
/// must fall within `[project_start, project_end]` and the start must not be
/// after the due date.
pub fn resolve_schedule(
    start_date: Option<Date>,
    due_date: Date,
    project_start: Date,
    project_end: Date,
) -> Result<Schedule, String> {
    let start_date = start_date.unwrap_or(due_date);

    if start_date > due_date {
        return Err(format!(
            "Start date ({start_date}) must be on or before due date ({due_date})"
        ));
    }
    if !contains_date(project_start, project_end, due_date) {
        return Err(format!(
            "Due date ({due_date}) must be within the project dates ({project_start} to {project_end})"
        ));
    }
    if !contains_date(project_start, project_end, start_date) {
        return Err(format!(
            "Start date ({start_date}) must be within the project dates ({project_start} to {project_end})"
        ));
    }

    Ok(Schedule {
        start_date,
        due_date,
        duration: duration_days(start_date, due_date),
    })
}

/// A milestone is overdue once its due date has passed without completion.
pub fn is_overdue(due_date: Date, status: MilestoneStatus, today: Date) -> bool {
    due_date < today && status != MilestoneStatus::Completed
}
