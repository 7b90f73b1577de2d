//! ui::format
//!
//! Human-readable rendering of change data.
//!
//! # Design
//!
//! Tables are plain text with hand-padded columns; JSON output is handled
//! by the commands themselves via serde. The `show` command renders a
//! selectable set of parts ([`ShowParts`]) so the default view stays fast
//! (no diff, no comments fetch unless asked).

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::gerrit::models::{ChangeInfo, CommentInfo, FileInfo};

/// Maximum subject width in the changes table.
const SUBJECT_WIDTH: usize = 60;

/// Which sections of a change `show` should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowParts {
    pub metadata: bool,
    pub files: bool,
    pub messages: bool,
    pub comments: bool,
}

impl Default for ShowParts {
    /// Default view: metadata + files + messages.
    fn default() -> Self {
        Self {
            metadata: true,
            files: true,
            messages: true,
            comments: false,
        }
    }
}

impl ShowParts {
    /// Parse a comma-separated parts spec.
    ///
    /// Accepted tokens: `metadata`/`m`, `files`/`f`, `messages`/`msg`,
    /// `comments`/`c`, `all`.
    ///
    /// # Errors
    ///
    /// Returns the offending token.
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut parts = Self {
            metadata: false,
            files: false,
            messages: false,
            comments: false,
        };
        for token in spec.split(',') {
            match token.trim().to_ascii_lowercase().as_str() {
                "metadata" | "m" => parts.metadata = true,
                "files" | "f" => parts.files = true,
                "messages" | "msg" => parts.messages = true,
                "comments" | "c" => parts.comments = true,
                "all" => {
                    return Ok(Self {
                        metadata: true,
                        files: true,
                        messages: true,
                        comments: true,
                    })
                }
                other => return Err(format!("unknown part '{}'", other)),
            }
        }
        Ok(parts)
    }
}

/// Render a list of changes as a plain-text table.
pub fn changes_table(changes: &[ChangeInfo]) -> String {
    if changes.is_empty() {
        return "No changes found".to_string();
    }

    let header = [
        "ID".to_string(),
        "Subject".to_string(),
        "Owner".to_string(),
        "Project".to_string(),
        "Status".to_string(),
        "+/-".to_string(),
        "Updated".to_string(),
    ];
    let rows: Vec<[String; 7]> = changes
        .iter()
        .map(|change| {
            [
                change.display_id(),
                truncate(&change.subject, SUBJECT_WIDTH),
                change
                    .owner
                    .as_ref()
                    .map(|o| o.display_name().to_string())
                    .unwrap_or_default(),
                change.project.clone(),
                change.status.clone(),
                format!("+{}/-{}", change.insertions, change.deletions),
                change
                    .updated
                    .as_deref()
                    .map(format_time)
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = header.iter().map(String::len).collect::<Vec<_>>();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let render_row = |row: &[String; 7]| -> String {
        row.iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<1$}", cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(&header));
    lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in &rows {
        lines.push(render_row(row));
    }
    lines.join("\n")
}

/// Render the selected parts of a change's detail view.
pub fn change_detail(
    change: &ChangeInfo,
    files: Option<&BTreeMap<String, FileInfo>>,
    comments: Option<&BTreeMap<String, Vec<CommentInfo>>>,
    parts: ShowParts,
) -> String {
    let mut sections = Vec::new();

    if parts.metadata {
        sections.push(metadata_section(change));
    }
    if parts.files {
        if let Some(files) = files {
            sections.push(files_section(files));
        }
    }
    if parts.messages {
        if let Some(messages) = &change.messages {
            sections.push(messages_section(messages));
        }
    }
    if parts.comments {
        if let Some(comments) = comments {
            sections.push(comments_section(comments));
        }
    }

    sections.join("\n\n")
}

fn metadata_section(change: &ChangeInfo) -> String {
    let mut lines = vec![
        format!("Change {}: {}", change.display_id(), change.subject),
        String::new(),
        format!("  Project:  {}", change.project),
        format!("  Branch:   {}", change.branch),
        format!("  Status:   {}", change.status),
        format!(
            "  Owner:    {}",
            change
                .owner
                .as_ref()
                .map(|o| o.display_name().to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        ),
        format!("  Size:     +{}/-{}", change.insertions, change.deletions),
    ];
    if let Some(updated) = &change.updated {
        lines.push(format!("  Updated:  {}", format_time(updated)));
    }
    if let Some(labels) = &change.labels {
        for (name, label) in labels {
            let vote = if label.approved.is_some() {
                "approved".to_string()
            } else if label.rejected.is_some() {
                "rejected".to_string()
            } else if let Some(value) = label.value {
                format!("{:+}", value)
            } else {
                "-".to_string()
            };
            lines.push(format!("  {}:  {}", name, vote));
        }
    }
    lines.join("\n")
}

fn files_section(files: &BTreeMap<String, FileInfo>) -> String {
    let mut lines = vec![format!("Files ({}):", count_real_files(files))];
    for (path, info) in files {
        if is_magic_path(path) {
            continue;
        }
        let status = info.status.as_deref().unwrap_or("M");
        let inserted = info.lines_inserted.unwrap_or(0);
        let deleted = info.lines_deleted.unwrap_or(0);
        lines.push(format!("  {} {} (+{}/-{})", status, path, inserted, deleted));
    }
    lines.join("\n")
}

fn messages_section(messages: &[crate::gerrit::models::MessageInfo]) -> String {
    let mut lines = vec![format!("Messages ({}):", messages.len())];
    for message in messages {
        let author = message
            .author
            .as_ref()
            .map(|a| a.display_name().to_string())
            .unwrap_or_else(|| "Gerrit".to_string());
        lines.push(format!(
            "  [{}] {}: {}",
            format_time(&message.date),
            author,
            first_line(&message.message)
        ));
    }
    lines.join("\n")
}

fn comments_section(comments: &BTreeMap<String, Vec<CommentInfo>>) -> String {
    let total: usize = comments.values().map(Vec::len).sum();
    let mut lines = vec![format!("Comments ({}):", total)];
    for (path, file_comments) in comments {
        lines.push(format!("  {}:", path));
        for comment in file_comments {
            let author = comment
                .author
                .as_ref()
                .map(|a| a.display_name().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let location = comment
                .line
                .map(|l| format!("L{}", l))
                .unwrap_or_else(|| "file".to_string());
            lines.push(format!(
                "    {} {}: {}",
                location,
                author,
                first_line(&comment.message)
            ));
        }
    }
    lines.join("\n")
}

/// Gerrit's synthetic file entries, excluded from file listings.
fn is_magic_path(path: &str) -> bool {
    matches!(path, "/COMMIT_MSG" | "/MERGE_LIST")
}

fn count_real_files(files: &BTreeMap<String, FileInfo>) -> usize {
    files.keys().filter(|p| !is_magic_path(p)).count()
}

/// Render a Gerrit timestamp (`2024-01-15 10:30:00.000000000`) compactly.
fn format_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
