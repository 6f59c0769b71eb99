use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::{Task, TaskId};
use crate::model::undo::UndoBuffer;

/// The whole persisted state: every task across every day, plus the handful
/// of settings and transient bits that travel with them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// When true the completed group renders above the incomplete group.
    #[serde(default)]
    pub completed_first: bool,
    #[serde(default)]
    pub undo: UndoBuffer,
    /// Last day the book was opened, for spotting date rollovers.
    #[serde(default)]
    pub last_open_day: Option<NaiveDate>,
}

impl Book {
    pub fn insert(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Remove by id, returning the task so callers can snapshot it.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// All tasks, oldest first.
    pub fn by_created_at(&self) -> Vec<&Task> {
        let mut out: Vec<&Task> = self.tasks.iter().collect();
        out.sort_by_key(|t| t.created_at);
        out
    }

    /// All tasks ordered by position. Positions only compare meaningfully
    /// within one day, so callers usually filter to a day first.
    pub fn by_position(&self) -> Vec<&Task> {
        let mut out: Vec<&Task> = self.tasks.iter().collect();
        out.sort_by(|a, b| a.position.total_cmp(&b.position));
        out
    }
}
