//! Filesystem adapters built on `cap-std` capability handles.
//!
//! Every operation opens the parent directory of the path it touches with
//! ambient authority and works relative to that handle.

mod atomic_io;
mod document_files;
mod snapshot_sequence;
mod snapshot_store;

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};

pub use self::document_files::FsDocumentFiles;
pub use self::snapshot_sequence::FsSnapshotSequence;
pub use self::snapshot_store::FsSnapshotStore;

/// Opens the directory containing `path` and returns it with the final
/// component.
fn open_parent(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{path} has no file name"))
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Opens `path` as a directory, `None` when it does not exist.
fn open_existing_dir(path: &Utf8Path) -> io::Result<Option<Dir>> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

/// Names of the regular files directly inside `dir`.
fn file_names(dir: &Dir) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for item in dir.entries()? {
        let entry = item?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let raw = entry.file_name();
        let Some(name) = raw.to_str() else {
            tracing::warn!(name = ?raw, "skipping file with a non-UTF-8 name");
            continue;
        };
        names.push(name.to_owned());
    }
    Ok(names)
}
