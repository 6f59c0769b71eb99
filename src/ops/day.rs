use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime};

use crate::model::task::Task;

/// Indices of the tasks belonging to `day`, oldest first. This creation
/// order is the baseline the ordering rules start from.
pub fn day_indices(tasks: &[Task], day: NaiveDate) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..tasks.len())
        .filter(|&i| tasks[i].day() == day)
        .collect();
    idx.sort_by_key(|&i| tasks[i].created_at);
    idx
}

/// The day's tasks, oldest first.
pub fn tasks_for_day(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    day_indices(tasks, day)
        .into_iter()
        .map(|i| &tasks[i])
        .collect()
}

/// How many of the day's tasks are done, as `(done, total)`.
pub fn day_progress(tasks: &[Task], day: NaiveDate) -> (usize, usize) {
    let mut done = 0;
    let mut total = 0;
    for task in tasks.iter().filter(|t| t.day() == day) {
        total += 1;
        if task.completed {
            done += 1;
        }
    }
    (done, total)
}

/// Every day with at least one task, most recent first.
pub fn distinct_days(tasks: &[Task]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = tasks.iter().map(Task::day).collect();
    days.sort();
    days.dedup();
    days.reverse();
    days
}

/// Pin a wall-clock datetime to the local zone: earliest side of a fold,
/// nudged forward out of a gap.
pub(crate) fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    let mut candidate = naive;
    for _ in 0..4 {
        match candidate.and_local_timezone(Local) {
            LocalResult::Single(at) => return at,
            LocalResult::Ambiguous(at, _) => return at,
            LocalResult::None => candidate += Duration::hours(1),
        }
    }
    Local::now()
}
