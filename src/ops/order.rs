use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime};

use crate::model::task::{Task, TaskId};
use crate::ops::day::{day_indices, distinct_days};

// ---------------------------------------------------------------------------
// Visible order
// ---------------------------------------------------------------------------

/// Indices of the day's tasks in display order: each completion group keeps
/// its internal position order, and the groups stack according to
/// `completed_first`.
pub fn visible_order(tasks: &[Task], day: NaiveDate, completed_first: bool) -> Vec<usize> {
    let mut idx = day_indices(tasks, day);
    // Stable over the creation-order baseline, so equal positions that can
    // appear mid-operation resolve deterministically.
    idx.sort_by(|&a, &b| tasks[a].position.total_cmp(&tasks[b].position));
    let (done, open): (Vec<usize>, Vec<usize>) =
        idx.into_iter().partition(|&i| tasks[i].completed);
    if completed_first {
        done.into_iter().chain(open).collect()
    } else {
        open.into_iter().chain(done).collect()
    }
}

/// Rewrite the day's positions as 1.0, 2.0, … in visible order. Every
/// structural change funnels through here so positions stay consecutive.
pub fn renumber(tasks: &mut [Task], day: NaiveDate, completed_first: bool) {
    for (rank, i) in visible_order(tasks, day, completed_first)
        .into_iter()
        .enumerate()
    {
        tasks[i].position = (rank + 1) as f64;
    }
}

/// Position for a task appended to the day: current max + 1, or 1 on an
/// empty day.
pub fn next_position(tasks: &[Task], day: NaiveDate) -> f64 {
    tasks
        .iter()
        .filter(|t| t.day() == day)
        .map(|t| t.position)
        .fold(0.0, f64::max)
        + 1.0
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Append a task per title, in order, at the end of the day's sequence.
/// Titles are trimmed; ones that trim to nothing are dropped. Returns the
/// ids of the created tasks.
pub fn create_tasks(
    tasks: &mut Vec<Task>,
    titles: Vec<String>,
    created_at: DateTime<Local>,
    completed_first: bool,
) -> Vec<TaskId> {
    let day = created_at.date_naive();
    let mut position = next_position(tasks, day);
    let mut ids = Vec::new();
    for title in titles {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            continue;
        }
        let task = Task::new(trimmed.to_string(), created_at, position);
        ids.push(task.id);
        tasks.push(task);
        position += 1.0;
    }
    if !ids.is_empty() {
        renumber(tasks, day, completed_first);
    }
    ids
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// Flip a task's completion state and renumber its day. The task keeps its
/// position through the flip, so the renumber folds it into its new group
/// ranked by where it sat: fresh completions surface at the top of the
/// completed block, reopened tasks sink to the bottom of the incomplete
/// block. Unknown ids are a no-op.
pub fn toggle_completed(tasks: &mut [Task], id: TaskId, completed_first: bool) -> bool {
    let Some(idx) = tasks.iter().position(|t| t.id == id) else {
        return false;
    };
    let day = tasks[idx].day();
    tasks[idx].completed = !tasks[idx].completed;
    renumber(tasks, day, completed_first);
    true
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

/// Move the block of `len` tasks starting at visible index `from` so that
/// it begins at visible index `to`. All indices are into the day's visible
/// order.
///
/// The block must lie in one completion group; a block that mixes states or
/// runs out of range leaves the day untouched. The destination clamps to
/// the block's own group, so a task cannot be dragged across the boundary.
pub fn reorder(
    tasks: &mut [Task],
    day: NaiveDate,
    completed_first: bool,
    from: usize,
    len: usize,
    to: usize,
) -> bool {
    let vis = visible_order(tasks, day, completed_first);
    if len == 0 || from + len > vis.len() {
        return false;
    }
    let state = tasks[vis[from]].completed;
    if vis[from..from + len]
        .iter()
        .any(|&i| tasks[i].completed != state)
    {
        return false;
    }

    // The block's group occupies one contiguous run of the visible order.
    let Some(group_start) = vis.iter().position(|&i| tasks[i].completed == state) else {
        return false;
    };
    let group_len = vis.iter().filter(|&&i| tasks[i].completed == state).count();
    let to = to.clamp(group_start, group_start + group_len - len);

    let mut order = vis;
    let block: Vec<usize> = order.drain(from..from + len).collect();
    for (offset, &i) in block.iter().enumerate() {
        order.insert(to + offset, i);
    }
    for (rank, &i) in order.iter().enumerate() {
        tasks[i].position = (rank + 1) as f64;
    }
    true
}

// ---------------------------------------------------------------------------
// Group order preference
// ---------------------------------------------------------------------------

/// Reissue every day's positions after the completed-first preference
/// changes. Groups swap places; order inside each group is untouched.
pub fn set_group_order(tasks: &mut [Task], completed_first: bool) {
    for day in distinct_days(tasks) {
        renumber(tasks, day, completed_first);
    }
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// Edit a task's title and/or time of day. The date component of
/// `created_at` is preserved, so a task never changes days; position and
/// grouping are left alone. A title that trims to nothing is ignored, as is
/// a wall-clock time that does not exist on that date.
pub fn edit_task(
    tasks: &mut [Task],
    id: TaskId,
    title: Option<&str>,
    time: Option<NaiveTime>,
) -> bool {
    let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
        return false;
    };
    if let Some(title) = title {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            task.title = trimmed.to_string();
        }
    }
    if let Some(time) = time {
        match task.day().and_time(time).and_local_timezone(Local) {
            LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => task.created_at = at,
            LocalResult::None => {}
        }
    }
    true
}
