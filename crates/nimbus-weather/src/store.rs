//! Local persistence for saved weather records.
//!
//! The whole collection lives in a single JSON slot behind the
//! [`StorageBackend`] trait, read-modify-written as a unit. `FileStorage` is
//! the durable backend; `MemoryStorage` backs tests and ephemeral use.

use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{RecordPatch, WeatherRecord};

/// A single string-keyed slot of durable storage.
pub trait StorageBackend {
    /// Read the slot; `Ok(None)` when nothing has been written yet.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the slot contents.
    fn write(&self, contents: &str) -> Result<(), StoreError>;
}

/// File-backed storage slot.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory storage slot.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        *self.slot.lock() = Some(contents.to_string());
        Ok(())
    }
}

/// Repository of saved weather records over an injected storage backend.
#[derive(Debug)]
pub struct RecordStore<S> {
    storage: S,
}

impl RecordStore<FileStorage> {
    /// Open a file-backed store at the given path.
    pub fn at_path<P: AsRef<Path>>(path: P) -> Self {
        Self::new(FileStorage::new(path))
    }
}

impl<S: StorageBackend> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Persist a record, assigning it a fresh opaque id. Returns the id.
    pub fn save(&self, record: &WeatherRecord) -> Result<String, StoreError> {
        let mut records = self.load_collection()?;

        let id = Uuid::new_v4().simple().to_string();
        let mut entry = record.clone();
        entry.id = Some(id.clone());
        records.push(entry);

        self.persist(&records)?;
        Ok(id)
    }

    /// All saved records, in insertion order.
    pub fn list(&self) -> Result<Vec<WeatherRecord>, StoreError> {
        self.load_collection()
    }

    /// Look up a record by id.
    pub fn get_by_id(&self, id: &str) -> Result<Option<WeatherRecord>, StoreError> {
        let records = self.load_collection()?;
        Ok(records.into_iter().find(|r| r.id.as_deref() == Some(id)))
    }

    /// Merge the patch into the record with the given id.
    ///
    /// Returns `Ok(false)` if no record has that id. Merged-field consistency
    /// is not validated here; callers own constraints like min <= max.
    pub fn update(&self, id: &str, patch: &RecordPatch) -> Result<bool, StoreError> {
        let mut records = self.load_collection()?;

        let Some(record) = records.iter_mut().find(|r| r.id.as_deref() == Some(id)) else {
            return Ok(false);
        };
        patch.apply(record);

        self.persist(&records)?;
        Ok(true)
    }

    /// Remove the record with the given id. Returns `Ok(false)` if absent.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.load_collection()?;

        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));
        if records.len() == before {
            return Ok(false);
        }

        self.persist(&records)?;
        Ok(true)
    }

    fn load_collection(&self) -> Result<Vec<WeatherRecord>, StoreError> {
        let Some(contents) = self.storage.read()? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&contents) {
            Ok(records) => Ok(records),
            Err(err) => {
                // Parse failure is treated as "no data", not an error.
                tracing::warn!("Saved record collection is unreadable, treating as empty: {err}");
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, records: &[WeatherRecord]) -> Result<(), StoreError> {
        let contents = serde_json::to_string(records)?;
        self.storage.write(&contents)
    }
}
