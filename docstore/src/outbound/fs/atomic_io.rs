//! Whole-file replacement through a temporary sibling and a rename.
//!
//! Readers of the target observe either the previous contents or the new
//! ones, never a partial write.

use std::io::{self, Write};

use cap_std::fs::{Dir, OpenOptions};
use uuid::Uuid;

/// Replaces `file_name` inside `dir` with `contents`.
pub(super) fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let staging = format!(".{file_name}.{}.tmp", Uuid::new_v4().simple());
    if let Err(error) = stage(dir, &staging, contents).and_then(|()| replace(dir, &staging, file_name)) {
        discard(dir, &staging);
        return Err(error);
    }
    sync_directory(dir);
    Ok(())
}

fn stage(dir: &Dir, staging: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(staging, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, staging: &str, target: &str) -> io::Result<()> {
    // Rename refuses to replace an existing target on Windows.
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    dir.rename(staging, dir, target)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, staging: &str, target: &str) -> io::Result<()> {
    dir.rename(staging, dir, target)
}

fn discard(dir: &Dir, staging: &str) {
    if dir.remove_file(staging).is_err() {
        // The staging file may never have been created.
    }
}

fn sync_directory(dir: &Dir) {
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is not supported everywhere.
    }
}
