use chrono::{DateTime, Duration, Local};

use crate::model::book::Book;
use crate::model::task::{Task, TaskId};
use crate::model::undo::TaskSnapshot;
use crate::ops::order::renumber;

/// Delete a task, capturing it in the book's undo slot first. Returns the
/// expiry token for the capture, or `None` if the id is unknown.
pub fn delete_task(
    book: &mut Book,
    id: TaskId,
    now: DateTime<Local>,
    ttl: Duration,
) -> Option<u64> {
    let task = book.remove(id)?;
    let day = task.day();
    let completed_first = book.completed_first;
    let token = book.undo.capture(TaskSnapshot::of(&task), now, ttl);
    renumber(&mut book.tasks, day, completed_first);
    Some(token)
}

/// Restore the captured deletion as a brand-new task: same title, creation
/// time, and completion state, fresh id, slotted back near its former
/// position. Returns the new id, or `None` when the slot is empty or past
/// its deadline.
pub fn restore_last(book: &mut Book, now: DateTime<Local>) -> Option<TaskId> {
    let snapshot = book.undo.take(now)?;
    let day = snapshot.created_at.date_naive();
    let mut task = Task::new(snapshot.title, snapshot.created_at, snapshot.former_position);
    task.completed = snapshot.completed;
    let id = task.id;
    let completed_first = book.completed_first;
    book.insert(task);
    renumber(&mut book.tasks, day, completed_first);
    Some(id)
}
