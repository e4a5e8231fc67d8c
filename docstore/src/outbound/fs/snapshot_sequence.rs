//! Filesystem implementation of [`SnapshotSequence`].
//!
//! Each series keeps its mark in a hidden `.{series}.seq` file next to the
//! snapshots. The numbered-file pattern never matches these names.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use super::atomic_io::write_atomic;
use super::open_existing_dir;
use crate::domain::ports::{SnapshotSequence, SnapshotSequenceError};

/// Persists per-series high-water marks as small text files.
#[derive(Debug, Clone)]
pub struct FsSnapshotSequence {
    dir: Utf8PathBuf,
}

impl FsSnapshotSequence {
    /// Creates a sequence stored under `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the mark files.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

fn mark_file(series: &str) -> String {
    format!(".{series}.seq")
}

impl SnapshotSequence for FsSnapshotSequence {
    fn last_issued(&self, series: &str) -> Result<u32, SnapshotSequenceError> {
        let io_error = |err: io::Error| SnapshotSequenceError::io(series, err.to_string());
        let Some(dir) = open_existing_dir(&self.dir).map_err(io_error)? else {
            return Ok(0);
        };
        let content = match dir.read_to_string(mark_file(series)) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(io_error(err)),
        };
        content
            .trim()
            .parse()
            .map_err(|_| SnapshotSequenceError::corrupt(series, content.trim()))
    }

    fn record_issued(&self, series: &str, number: u32) -> Result<(), SnapshotSequenceError> {
        if number <= self.last_issued(series)? {
            return Ok(());
        }
        let io_error = |err: io::Error| SnapshotSequenceError::io(series, err.to_string());
        let Some(dir) = open_existing_dir(&self.dir).map_err(io_error)? else {
            return Err(SnapshotSequenceError::io(
                series,
                format!("registries directory {} is missing", self.dir),
            ));
        };
        write_atomic(&dir, &mark_file(series), &number.to_string()).map_err(io_error)?;
        debug!(series, number, "snapshot high-water mark raised");
        Ok(())
    }
}
