//! Port for file operations inside the document zones.

use camino::Utf8Path;

use super::define_port_error;

define_port_error! {
    /// Errors raised by document file adapters.
    pub enum DocumentFilesError {
        /// The path does not exist.
        Missing {
            /// Path that was looked up.
            path: String,
        } => "{path} does not exist",
        /// The destination is already taken.
        AlreadyExists {
            /// Occupied destination.
            path: String,
        } => "{path} already exists",
        /// Any other I/O failure.
        Io {
            /// Path involved in the failed operation.
            path: String,
            /// Underlying error text.
            message: String,
        } => "i/o failure at {path}: {message}",
    }
}

/// File operations the scanner and publish transaction rely on.
///
/// Paths are absolute or relative to the process working directory.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentFiles: Send + Sync {
    /// Names of regular files directly inside `dir`. A missing directory
    /// yields an empty list.
    fn list_file_names(&self, dir: &Utf8Path) -> Result<Vec<String>, DocumentFilesError>;

    /// Whether `dir` exists and is a directory.
    fn dir_exists(&self, dir: &Utf8Path) -> bool;

    /// Whether `path` exists and is a regular file.
    fn file_exists(&self, path: &Utf8Path) -> bool;

    /// Creates `dir` and any missing parents.
    fn create_dir_all(&self, dir: &Utf8Path) -> Result<(), DocumentFilesError>;

    /// Copies `from` to `to`, refusing to overwrite an existing file.
    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), DocumentFilesError>;

    /// Deletes a file.
    fn remove_file(&self, path: &Utf8Path) -> Result<(), DocumentFilesError>;

    /// Moves `from` to `to`, refusing to overwrite an existing file. Falls
    /// back to copy and delete when a rename cannot cross devices.
    fn move_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), DocumentFilesError>;
}
