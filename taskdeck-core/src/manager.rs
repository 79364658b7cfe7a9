//! In-memory task collection for one interactive session.
//!
//! Insertion order is preserved and every query hands out clones, so callers
//! can never mutate the backing vector through a returned view. "Not found"
//! is an `Option`/`bool`, never an error.

use anyhow::{Result, bail};

use crate::task::{IdSequence, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Ordered collection of tasks plus the id sequence that feeds it.
#[derive(Debug, Default, Clone)]
pub struct TaskManager {
    tasks: Vec<Task>,
    seq: IdSequence,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Construct and append a task, returning a copy of it.
    ///
    /// Blank titles are rejected here; the entity itself accepts anything.
    pub fn add(&mut self, title: &str, description: &str) -> Result<Task> {
        if title.trim().is_empty() {
            bail!("task title must not be empty");
        }
        let task = Task::new(&mut self.seq, title, description);
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn find(&self, id: u64) -> Option<Task> {
        self.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn completed(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.completed).cloned().collect()
    }

    pub fn pending(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| !t.completed)
            .cloned()
            .collect()
    }

    /// Partial update. A blank or whitespace-only title keeps the existing
    /// one; a provided description always overwrites, even with an empty
    /// string. Returns false when the id is unknown.
    pub fn update(&mut self, id: u64, title: Option<&str>, description: Option<&str>) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if let Some(title) = title {
            if !title.trim().is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = description {
            task.description = description.to_string();
        }
        task.touch();
        true
    }

    /// Flip completion state, returning the new state, or `None` when the id
    /// is unknown.
    pub fn toggle(&mut self, id: u64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if task.completed {
            task.mark_incomplete();
        } else {
            task.mark_completed();
        }
        Some(task.completed)
    }

    pub fn stats(&self) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }

    /// Drop every task, returning how many were dropped. The id sequence is
    /// not rewound; ids are never reused within a session.
    pub fn clear(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    /// Swap in tasks restored from storage, reserving every restored id.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        for t in &tasks {
            self.seq.reserve(t.id);
        }
        self.tasks = tasks;
    }

    /// The id sequence backing this collection, for the decode path.
    pub fn sequence_mut(&mut self) -> &mut IdSequence {
        &mut self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(titles: &[&str]) -> TaskManager {
        let mut m = TaskManager::new();
        for t in titles {
            m.add(t, "").unwrap();
        }
        m
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let m = manager_with(&["a", "b", "c"]);
        let ids: Vec<u64> = m.all().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn add_rejects_blank_titles() {
        let mut m = TaskManager::new();
        assert!(m.add("", "desc").is_err());
        assert!(m.add("   ", "desc").is_err());
        assert!(m.is_empty());
    }

    #[test]
    fn queries_return_defensive_copies() {
        let m = manager_with(&["a"]);
        let mut view = m.all();
        view[0].title = "mutated".to_string();
        view.clear();
        assert_eq!(m.find(1).unwrap().title, "a");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn remove_reports_whether_anything_went() {
        let mut m = manager_with(&["a", "b"]);
        assert!(m.remove(1));
        assert!(!m.remove(99));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn completed_and_pending_partition_the_list() {
        let mut m = manager_with(&["a", "b", "c"]);
        m.toggle(1);
        m.toggle(3);
        let done: Vec<u64> = m.completed().iter().map(|t| t.id).collect();
        let open: Vec<u64> = m.pending().iter().map(|t| t.id).collect();
        assert_eq!(done, vec![1, 3]);
        assert_eq!(open, vec![2]);
    }

    #[test]
    fn update_ignores_blank_title_but_succeeds() {
        let mut m = manager_with(&["keep me"]);
        assert!(m.update(1, Some("   "), Some("new desc")));
        let t = m.find(1).unwrap();
        assert_eq!(t.title, "keep me");
        assert_eq!(t.description, "new desc");
        assert!(t.updated_at >= t.created_at);
    }

    #[test]
    fn update_overwrites_description_with_empty_string() {
        let mut m = TaskManager::new();
        m.add("t", "old").unwrap();
        assert!(m.update(1, None, Some("")));
        assert_eq!(m.find(1).unwrap().description, "");
    }

    #[test]
    fn update_unknown_id_returns_false() {
        let mut m = manager_with(&["a"]);
        assert!(!m.update(42, Some("x"), None));
    }

    #[test]
    fn toggle_flips_and_reports_new_state() {
        let mut m = manager_with(&["a"]);
        assert_eq!(m.toggle(1), Some(true));
        assert!(m.find(1).unwrap().completed_at.is_some());
        assert_eq!(m.toggle(1), Some(false));
        assert!(m.find(1).unwrap().completed_at.is_none());
        assert_eq!(m.toggle(42), None);
    }

    #[test]
    fn stats_counts_total_completed_pending() {
        let mut m = manager_with(&["a", "b", "c"]);
        m.toggle(1);
        m.toggle(2);
        assert_eq!(
            m.stats(),
            TaskStats {
                total: 3,
                completed: 2,
                pending: 1
            }
        );

        let empty = TaskManager::new();
        assert_eq!(empty.stats(), TaskStats::default());
    }

    #[test]
    fn clear_drops_everything_but_keeps_the_sequence() {
        let mut m = manager_with(&["a", "b"]);
        assert_eq!(m.clear(), 2);
        assert!(m.is_empty());
        let t = m.add("c", "").unwrap();
        assert_eq!(t.id, 3);
    }

    #[test]
    fn replace_all_reserves_restored_ids() {
        let mut m = TaskManager::new();
        let mut donor = TaskManager::new();
        let mut restored = Vec::new();
        for _ in 0..9 {
            restored.push(donor.add("r", "").unwrap());
        }
        m.replace_all(restored);
        assert_eq!(m.len(), 9);

        let a = m.add("fresh", "").unwrap();
        let b = m.add("fresher", "").unwrap();
        assert_eq!((a.id, b.id), (10, 11));
    }
}
