//! Store-level error type shared by every domain service.

use doc_name::IdentityError;
use thiserror::Error;

use crate::domain::ports::{DocumentFilesError, SnapshotSequenceError, SnapshotStoreError};

/// Failures surfaced by scans, publishing and registry snapshots.
///
/// Filename parse failures never appear here; they are reported through
/// `DecodedName::is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A document, directory or category does not exist.
    #[error("{subject} not found")]
    NotFound {
        /// What was looked up.
        subject: String,
    },
    /// The filesystem refused an operation.
    #[error("i/o failure at {path}: {message}")]
    Io {
        /// Path or snapshot name involved.
        path: String,
        /// Underlying error text.
        message: String,
    },
    /// The requested identity cannot be encoded into a filename.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),
    /// A destination file already exists.
    #[error("{path} already exists")]
    VersionConflict {
        /// Occupied destination.
        path: String,
    },
}

impl StoreError {
    /// Builds [`Self::NotFound`].
    #[must_use]
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound {
            subject: subject.into(),
        }
    }

    /// Builds [`Self::Io`].
    #[must_use]
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Builds [`Self::VersionConflict`].
    #[must_use]
    pub fn version_conflict(path: impl Into<String>) -> Self {
        Self::VersionConflict { path: path.into() }
    }
}

impl From<DocumentFilesError> for StoreError {
    fn from(error: DocumentFilesError) -> Self {
        match error {
            DocumentFilesError::Missing { path } => Self::NotFound { subject: path },
            DocumentFilesError::AlreadyExists { path } => Self::VersionConflict { path },
            DocumentFilesError::Io { path, message } => Self::Io { path, message },
        }
    }
}

impl From<SnapshotStoreError> for StoreError {
    fn from(error: SnapshotStoreError) -> Self {
        match error {
            SnapshotStoreError::Io { name, message } => Self::Io {
                path: name,
                message,
            },
        }
    }
}

impl From<SnapshotSequenceError> for StoreError {
    fn from(error: SnapshotSequenceError) -> Self {
        let message = error.to_string();
        match error {
            SnapshotSequenceError::Io { series, .. }
            | SnapshotSequenceError::Corrupt { series, .. } => Self::Io {
                path: series,
                message,
            },
        }
    }
}
