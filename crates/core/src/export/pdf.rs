//! PDF 1.4 project reports.
//!
//! Produces a text-only document using the standard Helvetica fonts with
//! WinAnsi encoding, so no font embedding is required. Long lines are
//! word-wrapped and content flows onto as many US-Letter pages as needed.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::ProjectExport;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const FONT_REGULAR: &[u8] = b"F1";
const FONT_BOLD: &[u8] = b"F2";
const MARGIN_LEFT: u32 = 50;
const TOP_Y: u32 = 742;
const BOTTOM_Y: u32 = 50;
const WRAP_COLUMNS: usize = 90;

/// One line of text in the report.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    bold: bool,
    size: u32,
}

impl Line {
    fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            size: 11,
        }
    }

    fn heading(text: impl Into<String>, size: u32) -> Self {
        Self {
            text: text.into(),
            bold: true,
            size,
        }
    }

    fn leading(&self) -> u32 {
        self.size + 6
    }
}

/// Render the project report as PDF bytes.
pub fn render(project: &ProjectExport) -> Vec<u8> {
    let pages = paginate(report_lines(project));
    write_document(&pages)
}

fn report_lines(project: &ProjectExport) -> Vec<Line> {
    let mut lines = vec![Line::heading(project.name.clone(), 18)];

    lines.push(Line::body(format!("Owner: {}", project.owner_username)));
    lines.push(Line::body(format!(
        "Schedule: {} to {}",
        project.start_date, project.end_date
    )));
    lines.push(Line::body(format!(
        "Status: {}",
        if project.is_archived { "Archived" } else { "Active" }
    )));
    lines.push(Line::body(format!(
        "Created: {}",
        project.created_at.format("%Y-%m-%d %H:%M UTC")
    )));

    if let Some(description) = project.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::body(""));
        lines.push(Line::heading("Description", 13));
        for paragraph in description.lines() {
            lines.extend(wrap(paragraph, WRAP_COLUMNS).into_iter().map(Line::body));
        }
    }

    lines.push(Line::body(""));
    lines.push(Line::heading(
        format!("Milestones ({})", project.milestones.len()),
        13,
    ));

    if project.milestones.is_empty() {
        lines.push(Line::body("No milestones."));
    }
    for m in &project.milestones {
        let row = format!(
            "- {}  |  {} to {}  |  {} day(s)  |  {}",
            m.name,
            m.start_date,
            m.due_date,
            m.duration,
            m.status.label()
        );
        lines.extend(wrap(&row, WRAP_COLUMNS).into_iter().map(Line::body));
    }

    lines
}

/// Greedy word wrap. Words longer than `width` are hard-split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            out.push(head);
        }
        let needed = if current.is_empty() { 0 } else { 1 } + word.chars().count();
        if current.chars().count() + needed > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Split lines into pages by vertical space.
fn paginate(lines: Vec<Line>) -> Vec<Vec<(Line, u32)>> {
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut y = TOP_Y;

    for line in lines {
        if y < BOTTOM_Y + line.leading() && !page.is_empty() {
            pages.push(std::mem::take(&mut page));
            y = TOP_Y;
        }
        y -= line.leading();
        page.push((line, y));
    }
    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

/// Encode text for the WinAnsi-encoded base fonts. Latin-1 maps one to one,
/// typographic punctuation uses its cp1252 slot, and anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

fn content_stream(page: &[(Line, u32)]) -> Vec<u8> {
    let mut content = Content::new();
    for (line, y) in page {
        let font = if line.bold { FONT_BOLD } else { FONT_REGULAR };
        content
            .begin_text()
            .set_font(Name(font), line.size as f32)
            .next_line(MARGIN_LEFT as f32, *y as f32)
            .show(Str(&win_ansi(&line.text)))
            .end_text();
    }
    content.finish().to_vec()
}

/// Serialize pages into a PDF 1.4 document.
///
/// Object layout: 1 catalog, 2 page tree, 3 regular font, 4 bold font, then
/// a (page, content) pair per page.
fn write_document(pages: &[Vec<(Line, u32)>]) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
        .map(|i| (Ref::new(5 + i * 2), Ref::new(6 + i * 2)))
        .collect();

    let mut pdf = Pdf::new();
    pdf.set_version(1, 4);
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(pages.len() as i32);

    for (font_id, base) in [(regular_id, "Helvetica"), (bold_id, "Helvetica-Bold")] {
        pdf.type1_font(font_id)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(*page_id);
        writer
            .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(tree_id)
            .contents(*content_id);
        writer
            .resources()
            .fonts()
            .pair(Name(FONT_REGULAR), regular_id)
            .pair(Name(FONT_BOLD), bold_id);
        writer.finish();

        pdf.stream(*content_id, &content_stream(page));
    }

    pdf.finish()
}
