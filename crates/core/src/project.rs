//! Project validation and the owner/collaborator permission model.

use serde::Serialize;

use crate::types::{Date, DbId};

/// Maximum length of a project or milestone name in characters.
pub const MAX_NAME_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a project or milestone name. Returns the trimmed name.
pub fn validate_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate that a project's end date is not before its start date.
pub fn validate_date_range(start_date: Date, end_date: Date) -> Result<(), String> {
    if end_date < start_date {
        return Err(format!(
            "End date ({end_date}) must be on or after start date ({start_date})"
        ));
    }
    Ok(())
}

/// Returns `true` if `date` lies within the inclusive project range.
pub fn contains_date(start_date: Date, end_date: Date, date: Date) -> bool {
    start_date <= date && date <= end_date
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// How the requesting user relates to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAccess {
    Owner,
    Collaborator,
}

impl ProjectAccess {
    /// Owners can change the project, its milestones and its collaborators.
    pub fn can_edit(self) -> bool {
        matches!(self, ProjectAccess::Owner)
    }
}

/// Resolve the access level of `user_id` on a project owned by `owner_id`.
///
/// Returns `None` when the user is neither the owner nor a collaborator.
pub fn resolve_access(owner_id: DbId, user_id: DbId, is_collaborator: bool) -> Option<ProjectAccess> {
    if owner_id == user_id {
        Some(ProjectAccess::Owner)
    } else if is_collaborator {
        Some(ProjectAccess::Collaborator)
    } else {
        None
    }
}
