use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::book::Book;
use crate::store::{BookStore, StoreError};

/// On-disk store: the whole book as one pretty-printed JSON document.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    book: Book,
}

impl JsonStore {
    /// Open `book.json` under `dir`, starting an empty book if the file is
    /// not there yet.
    pub fn open(dir: &Path) -> Result<JsonStore, StoreError> {
        let path = dir.join("book.json");
        let book = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Book::default(),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(JsonStore { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BookStore for JsonStore {
    fn book(&self) -> &Book {
        &self.book
    }

    fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json =
            serde_json::to_string_pretty(&self.book).map_err(StoreError::Serialize)?;
        atomic_write(&self.path, json.as_bytes())?;
        Ok(())
    }
}

/// Write via a temp file in the same directory, so a crash mid-write can
/// never leave a half-written book behind.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
