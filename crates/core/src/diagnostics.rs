//! Data integrity checks over projects, milestones and their links.
//!
//! The repository layer loads flat records and these functions decide what
//! counts as an issue.

use std::collections::HashMap;

use serde::Serialize;

use crate::dependency::cross_project_edges;
use crate::milestone::duration_days;
use crate::project::contains_date;
use crate::types::{Date, DbId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    OwnerIsCollaborator,
    MilestoneOutsideProject,
    DurationMismatch,
    CrossProjectDependency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticIssue {
    pub kind: IssueKind,
    pub project_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub total_users: i64,
    pub total_projects: i64,
    pub total_milestones: i64,
    pub issues: Vec<DiagnosticIssue>,
}

impl DiagnosticReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProjectRange {
    pub id: DbId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Clone)]
pub struct MilestoneRecord {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub start_date: Date,
    pub due_date: Date,
    pub duration: i64,
}

/// Projects whose owner also appears in the collaborator list.
///
/// `owner_links` holds `(project_id, owner_id)` for every such row.
pub fn owner_collaborator_issues(owner_links: &[(DbId, DbId)]) -> Vec<DiagnosticIssue> {
    owner_links
        .iter()
        .map(|&(project_id, owner_id)| DiagnosticIssue {
            kind: IssueKind::OwnerIsCollaborator,
            project_id: Some(project_id),
            milestone_id: None,
            message: format!("Owner {owner_id} is listed as a collaborator of project {project_id}"),
        })
        .collect()
}

/// Milestones outside their project's range or with a stale duration.
pub fn milestone_issues(
    projects: &[ProjectRange],
    milestones: &[MilestoneRecord],
) -> Vec<DiagnosticIssue> {
    let by_id: HashMap<DbId, &ProjectRange> = projects.iter().map(|p| (p.id, p)).collect();
    let mut issues = Vec::new();

    for m in milestones {
        if let Some(p) = by_id.get(&m.project_id) {
            let inside = contains_date(p.start_date, p.end_date, m.start_date)
                && contains_date(p.start_date, p.end_date, m.due_date);
            if !inside {
                issues.push(DiagnosticIssue {
                    kind: IssueKind::MilestoneOutsideProject,
                    project_id: Some(p.id),
                    milestone_id: Some(m.id),
                    message: format!(
                        "Milestone '{}' ({} to {}) falls outside project '{}' ({} to {})",
                        m.name, m.start_date, m.due_date, p.name, p.start_date, p.end_date
                    ),
                });
            }
        }

        let expected = duration_days(m.start_date, m.due_date);
        if m.duration != expected {
            issues.push(DiagnosticIssue {
                kind: IssueKind::DurationMismatch,
                project_id: Some(m.project_id),
                milestone_id: Some(m.id),
                message: format!(
                    "Milestone '{}' has duration {} but its dates span {} days",
                    m.name, m.duration, expected
                ),
            });
        }
    }

    issues
}

/// Dependency links that cross a project boundary.
pub fn dependency_issues(
    milestones: &[MilestoneRecord],
    edges: &[(DbId, DbId)],
) -> Vec<DiagnosticIssue> {
    let project_of: HashMap<DbId, DbId> =
        milestones.iter().map(|m| (m.id, m.project_id)).collect();

    cross_project_edges(edges, &project_of)
        .into_iter()
        .map(|(from, to)| DiagnosticIssue {
            kind: IssueKind::CrossProjectDependency,
            project_id: project_of.get(&from).copied(),
            milestone_id: Some(from),
            message: format!("Milestone {from} depends on milestone {to} from another project"),
        })
        .collect()
}

/// Run every check and assemble the report.
pub fn build_report(
    total_users: i64,
    projects: &[ProjectRange],
    milestones: &[MilestoneRecord],
    owner_links: &[(DbId, DbId)],
    edges: &[(DbId, DbId)],
) -> DiagnosticReport {
    let mut issues = owner_collaborator_issues(owner_links);
    issues.extend(milestone_issues(projects, milestones));
    issues.extend(dependency_issues(milestones, edges));

    DiagnosticReport {
        total_users,
        total_projects: projects.len() as i64,
        total_milestones: milestones.len() as i64,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn project(id: DbId) -> ProjectRange {
        ProjectRange {
            id,
            name: format!("P{id}"),
            start_date: d("2025-01-01"),
            end_date: d("2025-01-31"),
        }
    }

    fn milestone(id: DbId, project_id: DbId, start: &str, due: &str) -> MilestoneRecord {
        MilestoneRecord {
            id,
            project_id,
            name: format!("M{id}"),
            start_date: d(start),
            due_date: d(due),
            duration: duration_days(d(start), d(due)),
        }
    }

    #[test]
    fn clean_data_is_healthy() {
        let report = build_report(
            2,
            &[project(1)],
            &[milestone(1, 1, "2025-01-02", "2025-01-05")],
            &[],
            &[],
        );
        assert!(report.is_healthy());
        assert_eq!(report.total_users, 2);
        assert_eq!(report.total_projects, 1);
        assert_eq!(report.total_milestones, 1);
    }

    #[test]
    fn milestone_outside_range_reported() {
        let issues = milestone_issues(&[project(1)], &[milestone(7, 1, "2025-01-20", "2025-02-03")]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MilestoneOutsideProject);
        assert_eq!(issues[0].milestone_id, Some(7));
    }

    #[test]
    fn duration_mismatch_reported() {
        let mut m = milestone(3, 1, "2025-01-02", "2025-01-05");
        m.duration = 3;
        let issues = milestone_issues(&[project(1)], &[m]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DurationMismatch);
        assert!(issues[0].message.contains("span 4 days"));
    }

    #[test]
    fn owner_links_and_cross_project_edges_reported() {
        let milestones = [
            milestone(1, 1, "2025-01-02", "2025-01-03"),
            milestone(2, 2, "2025-01-02", "2025-01-03"),
        ];
        let report = build_report(1, &[project(1), project(2)], &milestones, &[(1, 9)], &[(1, 2)]);

        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::OwnerIsCollaborator, IssueKind::CrossProjectDependency]
        );
        assert!(!report.is_healthy());
    }
}
