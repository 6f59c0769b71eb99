use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identity. Assigned once at creation and never reused: a task
/// restored from the undo buffer comes back under a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> TaskId {
        TaskId(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> TaskId {
        TaskId::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<TaskId, Self::Err> {
        Ok(TaskId(Uuid::parse_str(s)?))
    }
}

/// A single task. It belongs to the local calendar day of its `created_at`,
/// and `position` orders it within that day's visible list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed: bool,
    pub position: f64,
    /// Marks a daily template instance; see `ops::recur`.
    #[serde(default)]
    pub daily: bool,
}

impl Task {
    /// Create an incomplete, non-daily task at the given position.
    pub fn new(title: String, created_at: DateTime<Local>, position: f64) -> Task {
        Task {
            id: TaskId::new(),
            title,
            created_at,
            completed: false,
            position,
            daily: false,
        }
    }

    /// The local calendar day this task belongs to.
    pub fn day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Time-of-day component, shown in lists and carried onto daily clones.
    pub fn time_of_day(&self) -> NaiveTime {
        self.created_at.time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn day_is_the_local_calendar_date() {
        let late = Local.with_ymd_and_hms(2026, 3, 14, 23, 59, 0).unwrap();
        let task = Task::new("Wind down".to_string(), late, 1.0);
        assert_eq!(task.day(), late.date_naive());
        assert_eq!(task.time_of_day().to_string(), "23:59:00");
    }

    #[test]
    fn ids_are_unique_and_round_trip_as_text() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
        let parsed: TaskId = a.to_string().parse().unwrap();
        assert_eq!(parsed, a);
    }
}
