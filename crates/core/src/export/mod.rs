//! Project export rendering (CSV and PDF).
//!
//! Handlers load a [`ProjectExport`] snapshot and pick a renderer by
//! [`ExportFormat`]; nothing here performs I/O beyond in-memory buffers.

pub mod csv;
pub mod pdf;

use std::str::FromStr;

use crate::milestone::MilestoneStatus;
use crate::types::{Date, Timestamp};

/// Error type for export rendering failures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!(
                "Unsupported export format '{other}'. Expected 'csv' or 'pdf'"
            )),
        }
    }
}

/// Snapshot of a project and its milestones for export.
#[derive(Debug, Clone)]
pub struct ProjectExport {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub owner_username: String,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub milestones: Vec<MilestoneExport>,
}

#[derive(Debug, Clone)]
pub struct MilestoneExport {
    pub name: String,
    pub start_date: Date,
    pub due_date: Date,
    pub duration: i64,
    pub status: MilestoneStatus,
}

/// Render a project in the requested format.
pub fn render(project: &ProjectExport, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => csv::render(project),
        ExportFormat::Pdf => Ok(pdf::render(project)),
    }
}

/// Build a download filename safe for a quoted `Content-Disposition` value.
///
/// Anything other than ASCII letters, digits, space, `-`, `_` and `.` becomes
/// `_`. An empty result falls back to `project`.
pub fn attachment_filename(project_name: &str, format: ExportFormat) -> String {
    let stem: String = project_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim();
    let stem = if stem.is_empty() { "project" } else { stem };
    format!("{stem}.{}", format.extension())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    pub fn sample_project(milestone_count: usize) -> ProjectExport {
        let start: Date = "2025-02-01".parse().unwrap();
        ProjectExport {
            name: "Roadmap".to_string(),
            description: Some("Quarterly plan".to_string()),
            start_date: start,
            end_date: "2025-03-01".parse().unwrap(),
            owner_username: "alice".to_string(),
            is_archived: false,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
            milestones: (0..milestone_count)
                .map(|i| MilestoneExport {
                    name: format!("Milestone {i}"),
                    start_date: start,
                    due_date: start + chrono::Duration::days(4),
                    duration: 5,
                    status: MilestoneStatus::InProgress,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("pdf".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn filename_is_sanitized() {
        assert_eq!(
            attachment_filename("Q1 \"Launch\"/Plan", ExportFormat::Csv),
            "Q1 _Launch__Plan.csv"
        );
        assert_eq!(attachment_filename("   ", ExportFormat::Pdf), "project.pdf");
        assert_eq!(attachment_filename("Café", ExportFormat::Pdf), "Caf_.pdf");
    }
}
