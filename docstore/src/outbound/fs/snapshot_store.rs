//! Filesystem implementation of [`SnapshotStore`].

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs::Dir;

use super::atomic_io::write_atomic;
use super::{file_names, open_existing_dir};
use crate::domain::ports::{SnapshotStore, SnapshotStoreError};

/// Keeps registry snapshots as text files in one directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    dir: Utf8PathBuf,
}

impl FsSnapshotStore {
    /// Creates a store over `dir`, which must exist before the first write.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the snapshots.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn open(&self, name: &str) -> Result<Option<Dir>, SnapshotStoreError> {
        open_existing_dir(&self.dir).map_err(|err| SnapshotStoreError::io(name, err.to_string()))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn list_names(&self) -> Result<Vec<String>, SnapshotStoreError> {
        let Some(dir) = self.open(self.dir.as_str())? else {
            return Ok(Vec::new());
        };
        file_names(&dir).map_err(|err| SnapshotStoreError::io(self.dir.as_str(), err.to_string()))
    }

    fn write_atomic(&self, name: &str, body: &str) -> Result<(), SnapshotStoreError> {
        let Some(dir) = self.open(name)? else {
            return Err(SnapshotStoreError::io(
                name,
                format!("registries directory {} is missing", self.dir),
            ));
        };
        write_atomic(&dir, name, body).map_err(|err| SnapshotStoreError::io(name, err.to_string()))
    }

    fn read(&self, name: &str) -> Result<Option<String>, SnapshotStoreError> {
        let Some(dir) = self.open(name)? else {
            return Ok(None);
        };
        match dir.read_to_string(name) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SnapshotStoreError::io(name, err.to_string())),
        }
    }

    fn remove(&self, name: &str) -> Result<(), SnapshotStoreError> {
        let Some(dir) = self.open(name)? else {
            return Err(SnapshotStoreError::io(name, "snapshot directory is missing"));
        };
        dir.remove_file(name)
            .map_err(|err| SnapshotStoreError::io(name, err.to_string()))
    }
}
