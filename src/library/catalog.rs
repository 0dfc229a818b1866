//! Persistent registry of imported books.
//!
//! [`Catalog`] is the seam between the reader and its metadata store. Two
//! implementations ship: [`JsonCatalog`] (a JSON file rewritten atomically on
//! every change) and [`MemoryCatalog`] (process memory only).
//!
//! Implementations take `&self` and lock internally, because the deferred
//! position writer calls into the catalog from its own thread.

use crate::model::{BookRecord, BookTitle, CatalogError, StorageError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Book metadata store.
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Register a new book positioned at line 0.
    ///
    /// Fails with [`CatalogError::DuplicateTitle`] if the title exists.
    fn create(&self, title: &BookTitle, length: usize) -> Result<BookRecord, CatalogError>;

    /// Store the last-read offset, clamped to the book's line range.
    fn update_last_position(&self, title: &BookTitle, offset: usize) -> Result<(), CatalogError>;

    /// Look up one book.
    fn get_by_title(&self, title: &BookTitle) -> Result<BookRecord, CatalogError>;

    /// All books in import order.
    fn list_all(&self) -> Result<Vec<BookRecord>, CatalogError>;

    /// Remove a book's record.
    fn delete_by_title(&self, title: &BookTitle) -> Result<(), CatalogError>;
}

/// Records keyed by title, shared by both catalog implementations.
#[derive(Debug, Clone, Default)]
struct Records(BTreeMap<BookTitle, BookRecord>);

impl Records {
    fn create(&mut self, title: &BookTitle, length: usize) -> Result<BookRecord, CatalogError> {
        if self.0.contains_key(title) {
            return Err(CatalogError::DuplicateTitle {
                title: title.to_string(),
            });
        }
        let record = BookRecord::new(title.clone(), length);
        self.0.insert(title.clone(), record.clone());
        Ok(record)
    }

    fn update_last_position(&mut self, title: &BookTitle, offset: usize) -> Result<(), CatalogError> {
        let record = self.0.get_mut(title).ok_or_else(|| not_found(title))?;
        record.last_position = offset.min(record.last_line());
        record.updated_at = Utc::now();
        Ok(())
    }

    fn get(&self, title: &BookTitle) -> Result<BookRecord, CatalogError> {
        self.0.get(title).cloned().ok_or_else(|| not_found(title))
    }

    fn list(&self) -> Vec<BookRecord> {
        let mut records: Vec<_> = self.0.values().cloned().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.title.cmp(&b.title)));
        records
    }

    fn delete(&mut self, title: &BookTitle) -> Result<BookRecord, CatalogError> {
        self.0.remove(title).ok_or_else(|| not_found(title))
    }
}

fn not_found(title: &BookTitle) -> CatalogError {
    CatalogError::NotFound {
        title: title.to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex.lock().map_err(|_| StorageError::Poisoned)
}

// ===== MemoryCatalog =====

/// Catalog held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    records: Mutex<Records>,
}

impl Catalog for MemoryCatalog {
    fn create(&self, title: &BookTitle, length: usize) -> Result<BookRecord, CatalogError> {
        lock(&self.records)?.create(title, length)
    }

    fn update_last_position(&self, title: &BookTitle, offset: usize) -> Result<(), CatalogError> {
        lock(&self.records)?.update_last_position(title, offset)
    }

    fn get_by_title(&self, title: &BookTitle) -> Result<BookRecord, CatalogError> {
        lock(&self.records)?.get(title)
    }

    fn list_all(&self) -> Result<Vec<BookRecord>, CatalogError> {
        Ok(lock(&self.records)?.list())
    }

    fn delete_by_title(&self, title: &BookTitle) -> Result<(), CatalogError> {
        lock(&self.records)?.delete(title).map(|_| ())
    }
}

// ===== JsonCatalog =====

/// On-disk layout of the catalog file.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    books: Vec<BookRecord>,
}

/// Catalog persisted as a JSON file.
///
/// The file is loaded once on construction and rewritten (temp file +
/// rename) after every successful mutation. A failed write rolls the
/// in-memory change back so memory and disk never diverge.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    records: Mutex<Records>,
}

impl JsonCatalog {
    /// Open the catalog at `path`; a missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => {
                let file: CatalogFile =
                    serde_json::from_str(&contents).map_err(|source| StorageError::Serialization {
                        path: path.clone(),
                        source,
                    })?;
                Records(
                    file.books
                        .into_iter()
                        .map(|record| (record.title.clone(), record))
                        .collect(),
                )
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Records::default(),
            Err(err) => return Err(StorageError::io(&path, err)),
        };
        debug!(path = %path.display(), books = records.0.len(), "Loaded catalog");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Location of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` and persist; restore the previous records if the write
    /// fails.
    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut Records) -> Result<R, CatalogError>,
    ) -> Result<R, CatalogError> {
        let mut records = lock(&self.records)?;
        let snapshot = records.clone();
        let result = change(&mut records)?;
        if let Err(err) = self.save(&records) {
            *records = snapshot;
            return Err(err.into());
        }
        Ok(result)
    }

    fn save(&self, records: &Records) -> Result<(), StorageError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|err| StorageError::io(dir, err))?;

        let file = CatalogFile {
            books: records.list(),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(|source| StorageError::Serialization {
            path: self.path.clone(),
            source,
        })?;

        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|err| StorageError::io(dir, err))?;
        staged
            .write_all(&json)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| StorageError::io(staged.path(), err))?;
        staged
            .persist(&self.path)
            .map_err(|err| StorageError::io(&self.path, err.error))?;
        Ok(())
    }
}

impl Catalog for JsonCatalog {
    fn create(&self, title: &BookTitle, length: usize) -> Result<BookRecord, CatalogError> {
        self.mutate(|records| records.create(title, length))
    }

    fn update_last_position(&self, title: &BookTitle, offset: usize) -> Result<(), CatalogError> {
        self.mutate(|records| records.update_last_position(title, offset))
    }

    fn get_by_title(&self, title: &BookTitle) -> Result<BookRecord, CatalogError> {
        lock(&self.records)?.get(title)
    }

    fn list_all(&self) -> Result<Vec<BookRecord>, CatalogError> {
        Ok(lock(&self.records)?.list())
    }

    fn delete_by_title(&self, title: &BookTitle) -> Result<(), CatalogError> {
        self.mutate(|records| records.delete(title).map(|_| ()))
    }
}
