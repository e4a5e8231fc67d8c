//! Domain services and value types for the document store.
//!
//! Nothing in this module touches the filesystem directly; every read and
//! write goes through a port in [`ports`].

pub mod document;
pub mod error;
pub mod layout;
pub mod ports;
pub mod publish;
pub mod registry;
pub mod scanner;
pub mod similarity;

pub use self::document::Document;
pub use self::error::StoreError;
pub use self::layout::{
    Category, DEFAULT_ACTIVE_DIR, DEFAULT_ARCHIVE_DIR, DEFAULT_DRAFTS_DIR, DEFAULT_EXTENSIONS,
    DEFAULT_REGISTRIES_DIR, DEFAULT_RETENTION, LayoutError, StoreConfig, Zone,
};
pub use self::publish::{PublishError, PublishReport, PublishRequest, PublishService, PublishStage};
pub use self::registry::{
    RegistryEntry, RegistryService, SnapshotOutcome, SnapshotScope, parse_entries,
};
pub use self::scanner::DirectoryScanner;
pub use self::similarity::{Comparison, FieldDifference, FieldMatch, compare, find_similar};
