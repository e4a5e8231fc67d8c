//! Filesystem implementation of [`DocumentFiles`].

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use super::{file_names, open_existing_dir, open_parent};
use crate::domain::ports::{DocumentFiles, DocumentFilesError};

/// Moves documents between zone directories on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentFiles;

impl FsDocumentFiles {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn map_error(path: &Utf8Path, error: &io::Error) -> DocumentFilesError {
    match error.kind() {
        io::ErrorKind::NotFound => DocumentFilesError::missing(path.as_str()),
        io::ErrorKind::AlreadyExists => DocumentFilesError::already_exists(path.as_str()),
        _ => DocumentFilesError::io(path.as_str(), error.to_string()),
    }
}

/// Opens the parent of `to` and refuses to proceed when `to` is taken.
fn open_free_target(to: &Utf8Path) -> Result<(Dir, &str), DocumentFilesError> {
    let (dir, name) = open_parent(to).map_err(|err| map_error(to, &err))?;
    if dir.exists(name) {
        return Err(DocumentFilesError::already_exists(to.as_str()));
    }
    Ok((dir, name))
}

impl DocumentFiles for FsDocumentFiles {
    fn list_file_names(&self, dir: &Utf8Path) -> Result<Vec<String>, DocumentFilesError> {
        let Some(handle) = open_existing_dir(dir).map_err(|err| map_error(dir, &err))? else {
            return Ok(Vec::new());
        };
        file_names(&handle).map_err(|err| DocumentFilesError::io(dir.as_str(), err.to_string()))
    }

    fn dir_exists(&self, dir: &Utf8Path) -> bool {
        Dir::open_ambient_dir(dir, ambient_authority()).is_ok()
    }

    fn file_exists(&self, path: &Utf8Path) -> bool {
        open_parent(path)
            .and_then(|(dir, name)| dir.metadata(name))
            .is_ok_and(|metadata| metadata.is_file())
    }

    fn create_dir_all(&self, dir: &Utf8Path) -> Result<(), DocumentFilesError> {
        Dir::create_ambient_dir_all(dir, ambient_authority())
            .map_err(|err| DocumentFilesError::io(dir.as_str(), err.to_string()))
    }

    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), DocumentFilesError> {
        let (source_dir, source_name) = open_parent(from).map_err(|err| map_error(from, &err))?;
        let (target_dir, target_name) = open_free_target(to)?;
        source_dir
            .copy(source_name, &target_dir, target_name)
            .map_err(|err| map_error(from, &err))?;
        debug!(from = %from, to = %to, "copied document");
        Ok(())
    }

    fn remove_file(&self, path: &Utf8Path) -> Result<(), DocumentFilesError> {
        let (dir, name) = open_parent(path).map_err(|err| map_error(path, &err))?;
        dir.remove_file(name).map_err(|err| map_error(path, &err))?;
        debug!(path = %path, "removed document");
        Ok(())
    }

    fn move_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), DocumentFilesError> {
        let (source_dir, source_name) = open_parent(from).map_err(|err| map_error(from, &err))?;
        let (target_dir, target_name) = open_free_target(to)?;
        match source_dir.rename(source_name, &target_dir, target_name) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
                debug!(from = %from, to = %to, "rename crosses devices; copying instead");
                source_dir
                    .copy(source_name, &target_dir, target_name)
                    .map_err(|copy_err| map_error(from, &copy_err))?;
                source_dir
                    .remove_file(source_name)
                    .map_err(|remove_err| map_error(from, &remove_err))?;
            }
            Err(err) => return Err(map_error(from, &err)),
        }
        debug!(from = %from, to = %to, "moved document");
        Ok(())
    }
}
