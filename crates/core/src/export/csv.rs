//! CSV export.

use ::csv::WriterBuilder;

use super::{ExportError, ProjectExport};

/// Render the project summary row followed by a milestone table.
///
/// ```text
/// Project Name,Start Date,End Date,Owner,Created At
/// Roadmap,2025-02-01,2025-03-01,alice,2025-01-15 09:30:00 UTC
///
/// Milestones
/// Name,Start Date,Due Date,Duration (days),Status
/// ...
/// ```
pub fn render(project: &ProjectExport) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer.write_record(["Project Name", "Start Date", "End Date", "Owner", "Created At"])?;
    writer.write_record([
        project.name.clone(),
        project.start_date.to_string(),
        project.end_date.to_string(),
        project.owner_username.clone(),
        project.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ])?;

    writer.write_record([""])?;
    writer.write_record(["Milestones"])?;
    writer.write_record(["Name", "Start Date", "Due Date", "Duration (days)", "Status"])?;

    for m in &project.milestones {
        writer.write_record([
            m.name.clone(),
            m.start_date.to_string(),
            m.due_date.to_string(),
            m.duration.to_string(),
            m.status.label().to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
