//! Task model and id allocation for a taskdeck session.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Fallback title substituted when a decoded row carries an empty title.
pub const UNTITLED: &str = "Untitled";

/// Current time at millisecond precision.
///
/// Tasks never carry sub-millisecond timestamps, so encoding to an ISO-8601
/// string with milliseconds and parsing it back is exact.
pub(crate) fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(now)
}

/// Monotonic id allocator.
///
/// Owned by the collection that constructs tasks and passed by `&mut` to the
/// decode path, which advances it past restored ids so fresh ids never
/// collide with loaded ones. Ids are never handed out twice within a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id and advance.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Advance-if-lower: after restoring a task with `id`, future fresh ids
    /// start past it.
    pub fn reserve(&mut self, id: u64) {
        if id >= self.next {
            self.next = id + 1;
        }
    }

    /// The id the next construction would receive.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// Core task record.
///
/// Invariant for tasks produced through the entity methods:
/// `completed == completed_at.is_some()` and `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Construct a fresh task with the next id from `seq`.
    ///
    /// An empty title is accepted here; rejecting blank titles is the
    /// manager's job, not the entity's.
    pub fn new(
        seq: &mut IdSequence,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = now_ms();
        Self {
            id: seq.next_id(),
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Mark completed. Calling twice just refreshes both timestamps.
    pub fn mark_completed(&mut self) {
        let now = now_ms();
        self.completed = true;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Mark incomplete, clearing `completed_at`.
    pub fn mark_incomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
        self.updated_at = now_ms();
    }

    /// Refresh `updated_at` after an edit.
    pub(crate) fn touch(&mut self) {
        self.updated_at = now_ms();
    }

    /// One-line human-readable summary: `[id] ✅|❌ title - description`.
    pub fn summary(&self) -> String {
        let mark = if self.completed { "✅" } else { "❌" };
        if self.description.is_empty() {
            format!("[{}] {} {}", self.id, mark, self.title)
        } else {
            format!("[{}] {} {} - {}", self.id, mark, self.title, self.description)
        }
    }
}
