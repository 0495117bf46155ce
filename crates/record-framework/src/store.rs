//! # Record Store
//!
//! [`JsonFileStore`] owns a single JSON file holding an array of records and offers
//! exactly two operations: read everything, replace everything.
//!
//! ## Durability
//!
//! `write_all` never touches the target file in place. The new content goes to a
//! uniquely named temporary file in the same directory, is flushed to disk, and is
//! then renamed over the target. Readers see either the old array or the new one.
//! If anything fails before the rename, the temporary file is removed and the old
//! file is left as it was.
//!
//! ## Recovery
//!
//! A missing file is created holding `[]`. A file that does not parse as an array
//! of objects reads back as empty; the next write replaces it.
//!
//! ## Concurrency
//!
//! There is no locking here. Two callers that both read, modify and write will race
//! and the later rename wins. Serialize mutations with
//! [`RepositoryActor`](crate::actor::RepositoryActor) when that matters.

use crate::error::StoreError;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The raw, unvalidated field map of one stored entity.
pub type Record = Map<String, Value>;

/// Name of the identifier field every record carries.
pub const ID_FIELD: &str = "id";

/// Reads the identifier of a record, if it has a valid one.
pub fn record_id(record: &Record) -> Option<u64> {
    record.get(ID_FIELD).and_then(Value::as_u64)
}

/// A flat record store backed by one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full array of records.
    ///
    /// Creates the file (and its directory) holding an empty array when it does not
    /// exist. Content that is not a JSON array of objects is treated as empty.
    pub fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, creating empty store");
                self.write_all(&[])?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        match serde_json::from_slice::<Vec<Record>>(&bytes) {
            Ok(records) => {
                debug!(path = %self.path.display(), count = records.len(), "Read records");
                Ok(records)
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "Unreadable store, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Atomically replaces the stored array with `records`.
    pub fn write_all(&self, records: &[Record]) -> Result<(), StoreError> {
        let dir = self.dir();
        std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let content = serde_json::to_vec_pretty(records)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&self.temp_prefix())
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&content)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        // On failure the returned PersistError owns the temp file and deletes it on drop.
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!(path = %self.path.display(), count = records.len(), "Wrote records");
        Ok(())
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn temp_prefix(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("records");
        format!("{stem}_")
    }
}
