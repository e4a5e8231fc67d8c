//! Port for reading and writing registry snapshot files.

use super::define_port_error;

define_port_error! {
    /// Errors raised by snapshot storage adapters.
    pub enum SnapshotStoreError {
        /// Any I/O failure while touching a snapshot file.
        Io {
            /// Snapshot file name, or the registries directory.
            name: String,
            /// Underlying error text.
            message: String,
        } => "snapshot storage failed for {name}: {message}",
    }
}

/// Flat store of snapshot bodies keyed by file name.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore: Send + Sync {
    /// File names currently stored. An absent store yields an empty list.
    fn list_names(&self) -> Result<Vec<String>, SnapshotStoreError>;

    /// Writes `body` under `name` so readers never observe a partial file.
    fn write_atomic(&self, name: &str, body: &str) -> Result<(), SnapshotStoreError>;

    /// Reads a body, `None` when the file is absent.
    fn read(&self, name: &str) -> Result<Option<String>, SnapshotStoreError>;

    /// Deletes a file.
    fn remove(&self, name: &str) -> Result<(), SnapshotStoreError>;
}
