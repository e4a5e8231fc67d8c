//! Ports through which the domain reaches storage.
//!
//! Adapters map their failures into the typed errors declared next to each
//! trait; the domain folds those into [`crate::domain::StoreError`].

mod macros;
pub(crate) use macros::define_port_error;

mod document_files;
mod snapshot_sequence;
mod snapshot_store;

#[cfg(test)]
pub use document_files::MockDocumentFiles;
pub use document_files::{DocumentFiles, DocumentFilesError};
#[cfg(test)]
pub use snapshot_sequence::MockSnapshotSequence;
pub use snapshot_sequence::{SnapshotSequence, SnapshotSequenceError};
#[cfg(test)]
pub use snapshot_store::MockSnapshotStore;
pub use snapshot_store::{SnapshotStore, SnapshotStoreError};
