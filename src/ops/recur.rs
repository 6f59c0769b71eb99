use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::task::{Task, TaskId};
use crate::ops::day::resolve_local;
use crate::ops::order::{next_position, renumber};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Daily templates due on `day`.
///
/// Tasks group by exact title and the latest-created instance speaks for
/// the habit: it must carry the daily flag, and no task with that title may
/// already sit on `day`, whatever its completion state. The result is
/// ordered oldest habit first.
pub fn pending_daily(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    let mut latest: HashMap<&str, &Task> = HashMap::new();
    for task in tasks {
        latest
            .entry(task.title.as_str())
            .and_modify(|cur| {
                if task.created_at > cur.created_at {
                    *cur = task;
                }
            })
            .or_insert(task);
    }
    let mut due: Vec<&Task> = latest
        .into_values()
        .filter(|t| t.daily)
        .filter(|t| !tasks.iter().any(|o| o.day() == day && o.title == t.title))
        .collect();
    due.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.title.cmp(&b.title))
    });
    due
}

/// Clone every due template onto `day`: same title and time of day, fresh
/// id, incomplete, still daily, appended at the end of the day's sequence.
/// Returns the ids of the created tasks.
pub fn materialize_daily(
    tasks: &mut Vec<Task>,
    day: NaiveDate,
    completed_first: bool,
) -> Vec<TaskId> {
    let due: Vec<(String, NaiveDateTime)> = pending_daily(tasks, day)
        .into_iter()
        .map(|t| (t.title.clone(), day.and_time(t.time_of_day())))
        .collect();
    if due.is_empty() {
        return Vec::new();
    }

    let mut position = next_position(tasks, day);
    let mut ids = Vec::new();
    for (title, naive) in due {
        let mut clone = Task::new(title, resolve_local(naive), position);
        clone.daily = true;
        ids.push(clone.id);
        tasks.push(clone);
        position += 1.0;
    }
    renumber(tasks, day, completed_first);
    ids
}

// ---------------------------------------------------------------------------
// Daily flag
// ---------------------------------------------------------------------------

/// Set a task's daily flag. Turning it off also clears every other task
/// with the same title, so the habit stops for good rather than reviving
/// from an older instance. Turning it on touches only the given task, which
/// as the latest instance of its title carries the habit from then on.
pub fn set_daily(tasks: &mut [Task], id: TaskId, daily: bool) -> bool {
    let Some(idx) = tasks.iter().position(|t| t.id == id) else {
        return false;
    };
    if daily {
        tasks[idx].daily = true;
    } else {
        let title = tasks[idx].title.clone();
        for task in tasks.iter_mut().filter(|t| t.title == title) {
            task.daily = false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
    }

    fn daily(title: &str, created_at: DateTime<Local>, position: f64) -> Task {
        let mut task = Task::new(title.to_string(), created_at, position);
        task.daily = true;
        task
    }

    #[test]
    fn due_when_latest_instance_is_daily_and_day_is_clear() {
        let tasks = vec![
            daily("Workout", at(13, 7, 30), 1.0),
            Task::new("One-off".to_string(), at(13, 9, 0), 2.0),
        ];
        let due = pending_daily(&tasks, at(14, 0, 0).date_naive());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Workout");
    }

    #[test]
    fn any_same_titled_task_on_the_day_blocks_the_clone() {
        let mut today = Task::new("Workout".to_string(), at(14, 8, 0), 1.0);
        today.completed = true;
        let tasks = vec![daily("Workout", at(13, 7, 30), 1.0), today];

        assert!(pending_daily(&tasks, at(14, 0, 0).date_naive()).is_empty());
    }

    #[test]
    fn the_latest_instance_speaks_for_the_habit() {
        // Monday's instance still carries the flag, but Tuesday's does not:
        // the habit is off.
        let mut tuesday = Task::new("Workout".to_string(), at(10, 7, 30), 1.0);
        tuesday.daily = false;
        let tasks = vec![daily("Workout", at(9, 7, 30), 1.0), tuesday];

        assert!(pending_daily(&tasks, at(11, 0, 0).date_naive()).is_empty());
    }

    #[test]
    fn clones_keep_title_and_time_and_start_fresh() {
        let mut template = daily("Workout", at(13, 7, 30), 1.0);
        template.completed = true;
        let mut tasks = vec![template, Task::new("Errands".to_string(), at(14, 6, 0), 1.0)];

        let ids = materialize_daily(&mut tasks, at(14, 0, 0).date_naive(), false);
        assert_eq!(ids.len(), 1);

        let clone = tasks.iter().find(|t| t.id == ids[0]).unwrap();
        assert_eq!(clone.title, "Workout");
        assert_eq!(clone.day(), at(14, 0, 0).date_naive());
        assert_eq!(clone.time_of_day().to_string(), "07:30:00");
        assert!(!clone.completed);
        assert!(clone.daily);
        // Appended after the day's existing task, then renumbered.
        assert_eq!(clone.position, 2.0);
    }

    #[test]
    fn materializing_twice_creates_nothing_new() {
        let mut tasks = vec![daily("Workout", at(13, 7, 30), 1.0)];
        let day = at(14, 0, 0).date_naive();

        assert_eq!(materialize_daily(&mut tasks, day, false).len(), 1);
        assert!(pending_daily(&tasks, day).is_empty());
        assert!(materialize_daily(&mut tasks, day, false).is_empty());
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn clones_carry_the_habit_to_the_next_day() {
        let mut tasks = vec![daily("Workout", at(13, 7, 30), 1.0)];
        materialize_daily(&mut tasks, at(14, 0, 0).date_naive(), false);
        let due = pending_daily(&tasks, at(15, 0, 0).date_naive());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].day(), at(14, 0, 0).date_naive());
    }

    #[test]
    fn turning_daily_off_clears_every_instance_of_the_title() {
        let mut tasks = vec![
            daily("Workout", at(12, 7, 30), 1.0),
            daily("Workout", at(13, 7, 30), 1.0),
            daily("Workout", at(14, 7, 30), 1.0),
            daily("Read", at(13, 21, 0), 2.0),
        ];
        let middle = tasks[1].id;

        assert!(set_daily(&mut tasks, middle, false));
        assert!(tasks[0..3].iter().all(|t| !t.daily));
        assert!(tasks[3].daily);
    }

    #[test]
    fn turning_daily_on_touches_only_that_task() {
        let mut tasks = vec![
            Task::new("Stretch".to_string(), at(13, 7, 0), 1.0),
            Task::new("Stretch".to_string(), at(14, 7, 0), 1.0),
        ];
        let latest = tasks[1].id;

        assert!(set_daily(&mut tasks, latest, true));
        assert!(!tasks[0].daily);
        assert!(tasks[1].daily);
        assert!(!set_daily(&mut tasks, TaskId::new(), true));
    }
}
