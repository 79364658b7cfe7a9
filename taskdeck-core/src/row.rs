//! Row codec: one task <-> one `;`-delimited text row.
//!
//! Fixed 7-field layout:
//!   id;title;description;completed;createdAt;updatedAt;completedAt
//!
//! Title and description are always quoted, with embedded `"` doubled
//! (`Task with "quotes"` encodes as `"Task with ""quotes"""`). The other
//! fields are written bare. The splitter is a three-state machine that
//! tolerates unbalanced quoting instead of rejecting it, so rows written by
//! other tools (including fully unquoted ones) still load.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::task::{IdSequence, Task, UNTITLED};

pub const SEPARATOR: char = ';';
pub const QUOTE: char = '"';
pub const FIELD_COUNT: usize = 7;

/// Header line written at the top of every save file.
pub const HEADER: &str = "id;title;description;completed;createdAt;updatedAt;completedAt";

/// Encode layout: ISO-8601 with milliseconds, UTC.
const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A defect in one row. Fatal to that row only; bulk loading collects these
/// and keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("invalid id {0:?}")]
    InvalidId(String),

    #[error("invalid {field} timestamp {value:?}")]
    Timestamp { field: &'static str, value: String },
}

fn quote_field(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(QUOTE);
    for c in s.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    out
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, RowError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RowError::Timestamp {
            field,
            value: value.to_string(),
        })
}

/// Encode a task as one row. Lossless against [`decode_row`].
pub fn encode_row(task: &Task) -> String {
    format!(
        "{};{};{};{};{};{};{}",
        task.id,
        quote_field(&task.title),
        quote_field(&task.description),
        task.completed,
        format_timestamp(task.created_at),
        format_timestamp(task.updated_at),
        task.completed_at.map(format_timestamp).unwrap_or_default(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    /// Outside any quoted span; a quote opens one only at field start.
    Unquoted,
    /// Inside a quoted span.
    Quoted,
    /// Saw a quote inside a quoted span; the next char decides whether it was
    /// an escape, the closing quote, or a stray literal.
    PendingEscape,
}

/// Split a row into fields, honoring `"` quoting with `""` escapes.
///
/// A field that does not begin with `"` is taken verbatim up to the next
/// separator. An unterminated quoted span runs to end-of-row, and a stray
/// quote inside a quoted span is kept as a literal character.
pub fn split_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = SplitState::Unquoted;

    for c in row.chars() {
        match state {
            SplitState::Unquoted => {
                if c == SEPARATOR {
                    fields.push(std::mem::take(&mut field));
                } else if c == QUOTE && field.is_empty() {
                    state = SplitState::Quoted;
                } else {
                    field.push(c);
                }
            }
            SplitState::Quoted => {
                if c == QUOTE {
                    state = SplitState::PendingEscape;
                } else {
                    field.push(c);
                }
            }
            SplitState::PendingEscape => {
                if c == QUOTE {
                    field.push(QUOTE);
                    state = SplitState::Quoted;
                } else if c == SEPARATOR {
                    fields.push(std::mem::take(&mut field));
                    state = SplitState::Unquoted;
                } else {
                    field.push(QUOTE);
                    field.push(c);
                    state = SplitState::Quoted;
                }
            }
        }
    }
    fields.push(field);
    fields
}

/// Decode one row into a task, advancing `seq` past the restored id.
///
/// An empty title becomes [`UNTITLED`]. The `completed` field is `true` iff
/// it equals the literal `true`; anything else coerces to `false`. A blank
/// `completedAt` means "not completed yet". Non-blank timestamps that fail to
/// parse are an error for this row.
pub fn decode_row(row: &str, seq: &mut IdSequence) -> Result<Task, RowError> {
    let fields = split_row(row);
    if fields.len() != FIELD_COUNT {
        return Err(RowError::FieldCount {
            expected: FIELD_COUNT,
            actual: fields.len(),
        });
    }

    let id: u64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| RowError::InvalidId(fields[0].clone()))?;

    let title = if fields[1].is_empty() {
        UNTITLED.to_string()
    } else {
        fields[1].clone()
    };

    let completed = fields[3] == "true";

    let created_at = parse_timestamp("createdAt", &fields[4])?;
    let updated_at = parse_timestamp("updatedAt", &fields[5])?;
    let completed_at = if fields[6].trim().is_empty() {
        None
    } else {
        Some(parse_timestamp("completedAt", &fields[6])?)
    };

    seq.reserve(id);

    Ok(Task {
        id,
        title,
        description: fields[2].clone(),
        completed,
        created_at,
        updated_at,
        completed_at,
    })
}
