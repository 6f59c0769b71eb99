pub mod json;

pub use json::JsonStore;

use std::path::PathBuf;

use crate::model::book::Book;
use crate::model::task::{Task, TaskId};

/// Error type for book persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed book file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize book: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a book lives. Record-level edits go through the book itself; a
/// store's job is handing the book out and writing it back.
pub trait BookStore {
    fn book(&self) -> &Book;
    fn book_mut(&mut self) -> &mut Book;

    /// Persist the current book.
    fn save(&mut self) -> Result<(), StoreError>;

    fn insert(&mut self, task: Task) {
        self.book_mut().insert(task);
    }

    fn remove(&mut self, id: TaskId) -> Option<Task> {
        self.book_mut().remove(id)
    }
}

/// In-memory store for tests and ephemeral sessions. Saves can be told to
/// fail, to exercise the paths that must shrug a failed write off.
#[derive(Debug, Default)]
pub struct MemStore {
    book: Book,
    pub fail_saves: bool,
    pub saves: usize,
}

impl MemStore {
    pub fn with_book(book: Book) -> MemStore {
        MemStore {
            book,
            fail_saves: false,
            saves: 0,
        }
    }
}

impl BookStore for MemStore {
    fn book(&self) -> &Book {
        &self.book
    }

    fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io(std::io::Error::other("saving disabled")));
        }
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn trait_record_methods_reach_the_book() {
        let mut store = MemStore::default();
        let at = Local.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let task = Task::new("Workout".to_string(), at, 1.0);
        let id = task.id;

        store.insert(task);
        assert_eq!(store.book().tasks.len(), 1);
        assert_eq!(store.remove(id).unwrap().title, "Workout");
        assert!(store.book().tasks.is_empty());
    }

    #[test]
    fn mem_store_counts_and_fails_on_demand() {
        let mut store = MemStore::default();
        store.save().unwrap();
        assert_eq!(store.saves, 1);

        store.fail_saves = true;
        assert!(store.save().is_err());
        assert_eq!(store.saves, 1);
    }
}
