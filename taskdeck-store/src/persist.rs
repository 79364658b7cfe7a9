//! Bulk load/save of the task file through the row codec.
//!
//! Loading is lenient by design: the job is to recover as much data as
//! possible from a partially corrupt file. A row that fails to decode is
//! skipped and reported, never fatal to the batch. File-level I/O failures
//! propagate once with a stable prefix.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::warn;

use taskdeck_core::{HEADER, IdSequence, RowError, Task, TaskManager, decode_row, encode_row};

use crate::file::SaveFile;

/// Substring that marks the first line as a header. Files written by hand may
/// omit the header entirely; those load as all-data.
const HEADER_SIGNATURE: &str = "id;title;description";

fn is_header(line: &str) -> bool {
    line.contains(HEADER_SIGNATURE)
}

/// Outcome of parsing a whole file: every recoverable task plus the rows
/// that had to be skipped (1-based line number and the defect).
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tasks: Vec<Task>,
    pub skipped: Vec<(usize, RowError)>,
}

/// What a [`load_tasks`] call put into the manager.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: Vec<(usize, RowError)>,
}

/// Render the full file: header plus one row per task in collection order.
pub fn render_file(tasks: &[Task]) -> String {
    let mut out = String::from(HEADER);
    for task in tasks {
        out.push('\n');
        out.push_str(&encode_row(task));
    }
    out.push('\n');
    out
}

/// Parse a whole file leniently.
///
/// The first line is skipped when it looks like the header; blank lines are
/// ignored; every other line is decoded independently, advancing `seq` past
/// each restored id. Malformed rows are collected and logged as warnings.
pub fn parse_file(text: &str, seq: &mut IdSequence) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, line) in text.lines().enumerate() {
        if idx == 0 && is_header(line) {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        match decode_row(line, seq) {
            Ok(task) => report.tasks.push(task),
            Err(err) => {
                warn!(line = idx + 1, %err, "skipping malformed task row");
                report.skipped.push((idx + 1, err));
            }
        }
    }

    report
}

/// Serialize the whole collection and overwrite the save file.
pub async fn save_tasks(store: &SaveFile, manager: &TaskManager) -> Result<()> {
    let text = render_file(&manager.all());
    store.write(&text).await.context("Failed to save tasks")
}

/// Load the save file into `manager`, replacing its contents. A missing file
/// is a normal empty result, not an error.
pub async fn load_tasks(store: &SaveFile, manager: &mut TaskManager) -> Result<LoadSummary> {
    let Some(text) = store.read().await.context("Failed to load tasks")? else {
        manager.replace_all(Vec::new());
        return Ok(LoadSummary::default());
    };

    let report = parse_file(&text, manager.sequence_mut());
    let summary = LoadSummary {
        loaded: report.tasks.len(),
        skipped: report.skipped,
    };
    manager.replace_all(report.tasks);
    Ok(summary)
}

/// Remove the save file; missing is a no-op. Returns whether a file went.
pub async fn delete_save(store: &SaveFile) -> Result<bool> {
    store.delete().await.context("Failed to delete save file")
}

/// Copy the save file to a timestamped sibling, returning the backup path.
///
/// The name embeds an ISO timestamp with `:` and `.` replaced by `-` so it
/// stays a valid filename everywhere.
pub async fn backup(store: &SaveFile) -> Result<PathBuf> {
    let stamp = Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    let name = format!("tasks-backup-{stamp}.csv");
    let dest = match store.path().parent() {
        Some(dir) => dir.join(&name),
        None => PathBuf::from(&name),
    };
    store
        .copy_to(&dest)
        .await
        .context("Failed to create backup")?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_ROW: &str =
        "1;\"Buy milk\";\"2% milk\";false;2024-01-01T00:00:00.000Z;2024-01-01T00:00:00.000Z;";
    const DONE_ROW: &str = "2;\"Clean\";\"\";true;2024-01-01T00:00:00.000Z;2024-01-01T02:00:00.000Z;2024-01-01T02:00:00.000Z";

    #[test]
    fn header_detection_matches_signature_only() {
        assert!(is_header(HEADER));
        assert!(is_header("id;title;description;completed"));
        assert!(!is_header(GOOD_ROW));
    }

    #[test]
    fn render_emits_header_then_rows() {
        let mut seq = IdSequence::new();
        let tasks = vec![
            decode_row(GOOD_ROW, &mut seq).unwrap(),
            decode_row(DONE_ROW, &mut seq).unwrap(),
        ];
        let text = render_file(&tasks);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], GOOD_ROW);
        assert_eq!(lines[2], DONE_ROW);
    }

    #[test]
    fn parse_skips_header_and_blank_lines() {
        let text = format!("{HEADER}\n{GOOD_ROW}\n\n{DONE_ROW}\n");
        let mut seq = IdSequence::new();
        let report = parse_file(&text, &mut seq);
        assert_eq!(report.tasks.len(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(seq.peek(), 3);
    }

    #[test]
    fn parse_accepts_headerless_files() {
        let text = format!("{GOOD_ROW}\n{DONE_ROW}\n");
        let mut seq = IdSequence::new();
        let report = parse_file(&text, &mut seq);
        assert_eq!(report.tasks.len(), 2);
    }

    #[test]
    fn one_bad_row_does_not_sink_the_batch() {
        let text = format!("{HEADER}\n{GOOD_ROW}\nthis;is;garbage\n{DONE_ROW}\n");
        let mut seq = IdSequence::new();
        let report = parse_file(&text, &mut seq);
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.skipped.len(), 1);

        let (line, err) = &report.skipped[0];
        assert_eq!(*line, 3);
        assert_eq!(
            *err,
            RowError::FieldCount {
                expected: 7,
                actual: 3
            }
        );
    }

    #[test]
    fn parse_then_render_round_trips() {
        let text = format!("{HEADER}\n{GOOD_ROW}\n{DONE_ROW}\n");
        let mut seq = IdSequence::new();
        let report = parse_file(&text, &mut seq);
        assert_eq!(render_file(&report.tasks), text);
    }
}
