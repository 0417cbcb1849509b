//! Notification types and message text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Milestones due within this many days (inclusive) trigger a reminder.
pub const DEFAULT_DUE_WINDOW_DAYS: i64 = 3;

pub const TYPE_MILESTONE_DUE: &str = "milestone_due";
pub const TYPE_PROJECT_SHARED: &str = "project_shared";
pub const TYPE_MILESTONE_ADDED: &str = "milestone_added";

/// Kind of event a notification describes. Stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    MilestoneDue,
    ProjectShared,
    MilestoneAdded,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::MilestoneDue => TYPE_MILESTONE_DUE,
            NotificationType::ProjectShared => TYPE_PROJECT_SHARED,
            NotificationType::MilestoneAdded => TYPE_MILESTONE_ADDED,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TYPE_MILESTONE_DUE => Ok(NotificationType::MilestoneDue),
            TYPE_PROJECT_SHARED => Ok(NotificationType::ProjectShared),
            TYPE_MILESTONE_ADDED => Ok(NotificationType::MilestoneAdded),
            other => Err(format!("Unknown notification type '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub fn project_shared_message(owner_username: &str, project_name: &str) -> String {
    format!("{owner_username} shared the project '{project_name}' with you.")
}

pub fn milestone_added_message(milestone_name: &str, project_name: &str) -> String {
    format!("New milestone '{milestone_name}' was added to project '{project_name}'.")
}

pub fn milestone_due_message(milestone_name: &str, days_left: i64) -> String {
    format!("Milestone '{milestone_name}' is due in {days_left} days.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_round_trips() {
        for t in [
            NotificationType::MilestoneDue,
            NotificationType::ProjectShared,
            NotificationType::MilestoneAdded,
        ] {
            assert_eq!(t.as_str().parse::<NotificationType>(), Ok(t));
        }
        assert!("other".parse::<NotificationType>().is_err());
    }

    #[test]
    fn due_message_matches_reminder_wording() {
        assert_eq!(
            milestone_due_message("Beta", 2),
            "Milestone 'Beta' is due in 2 days."
        );
    }

    #[test]
    fn shared_message_names_owner_and_project() {
        let msg = project_shared_message("alice", "Roadmap");
        assert!(msg.contains("alice"));
        assert!(msg.contains("'Roadmap'"));
    }
}
