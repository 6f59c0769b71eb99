use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::model::task::{Task, TaskId};

/// What survives of a deleted task while it can still be restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// The deleted task's id, kept for reference; restore mints a new one.
    pub id: TaskId,
    pub title: String,
    pub created_at: DateTime<Local>,
    pub completed: bool,
    pub former_position: f64,
}

impl TaskSnapshot {
    pub fn of(task: &Task) -> TaskSnapshot {
        TaskSnapshot {
            id: task.id,
            title: task.title.clone(),
            created_at: task.created_at,
            completed: task.completed,
            former_position: task.position,
        }
    }
}

/// Single-slot undo buffer. Holds the most recent deletion until its
/// deadline passes.
///
/// Expiry is cooperative rather than timer-driven: `capture` hands back a
/// generation token, and an `expire` call only clears the slot while its
/// token is still the live one. Any newer capture, restore, or sweep bumps
/// the generation, so older pending expiries become no-ops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UndoBuffer {
    slot: Option<TaskSnapshot>,
    deadline: Option<DateTime<Local>>,
    #[serde(skip)]
    generation: u64,
}

impl UndoBuffer {
    /// Store a snapshot, replacing any previous one. Returns the token a
    /// deferred expiry for this capture must present.
    pub fn capture(&mut self, snapshot: TaskSnapshot, now: DateTime<Local>, ttl: Duration) -> u64 {
        self.slot = Some(snapshot);
        self.deadline = Some(now + ttl);
        self.generation += 1;
        self.generation
    }

    /// Clear the slot if `token` is still the live generation. Stale tokens
    /// belong to cancelled expiries and do nothing.
    pub fn expire(&mut self, token: u64) {
        if token == self.generation {
            self.clear();
        }
    }

    /// Drop the snapshot if its deadline has passed. Returns whether the
    /// slot was cleared.
    pub fn sweep(&mut self, now: DateTime<Local>) -> bool {
        if let Some(deadline) = self.deadline
            && now > deadline
        {
            self.clear();
            return true;
        }
        false
    }

    /// Take the snapshot for restoring, or `None` if the slot is empty or
    /// past its deadline. The slot is cleared either way.
    pub fn take(&mut self, now: DateTime<Local>) -> Option<TaskSnapshot> {
        self.sweep(now);
        let snapshot = self.slot.take();
        if snapshot.is_some() {
            self.clear();
        }
        snapshot
    }

    /// Whether an undo affordance should currently be offered.
    pub fn is_armed(&self, now: DateTime<Local>) -> bool {
        self.slot.is_some() && self.deadline.is_some_and(|d| now <= d)
    }

    fn clear(&mut self) {
        self.slot = None;
        self.deadline = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_snapshot() -> TaskSnapshot {
        let at = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        TaskSnapshot::of(&Task::new("Workout".to_string(), at, 2.0))
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn capture_arms_and_take_disarms() {
        let mut buf = UndoBuffer::default();
        assert!(!buf.is_armed(now()));

        buf.capture(sample_snapshot(), now(), Duration::seconds(5));
        assert!(buf.is_armed(now()));

        let snap = buf.take(now() + Duration::seconds(3)).unwrap();
        assert_eq!(snap.title, "Workout");
        assert!(!buf.is_armed(now() + Duration::seconds(3)));
        assert_eq!(buf.take(now() + Duration::seconds(3)), None);
    }

    #[test]
    fn slot_dies_at_its_deadline() {
        let mut buf = UndoBuffer::default();
        buf.capture(sample_snapshot(), now(), Duration::seconds(5));

        assert!(buf.is_armed(now() + Duration::seconds(5)));
        assert!(!buf.is_armed(now() + Duration::seconds(6)));
        assert_eq!(buf.take(now() + Duration::seconds(6)), None);
    }

    #[test]
    fn expire_honors_only_the_live_token() {
        let mut buf = UndoBuffer::default();
        let first = buf.capture(sample_snapshot(), now(), Duration::seconds(5));
        let second = buf.capture(sample_snapshot(), now(), Duration::seconds(5));

        // The first capture's expiry was implicitly cancelled by the second.
        buf.expire(first);
        assert!(buf.is_armed(now()));

        buf.expire(second);
        assert!(!buf.is_armed(now()));
    }

    #[test]
    fn restore_cancels_a_pending_expiry() {
        let mut buf = UndoBuffer::default();
        let token = buf.capture(sample_snapshot(), now(), Duration::seconds(5));

        assert!(buf.take(now()).is_some());
        let relodged = buf.capture(sample_snapshot(), now(), Duration::seconds(5));
        buf.expire(token);
        assert!(buf.is_armed(now()));
        buf.expire(relodged);
        assert!(!buf.is_armed(now()));
    }
}
