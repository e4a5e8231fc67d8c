//! Numbered registry snapshots of the active zone.
//!
//! Each scope owns a series of numbered files plus a `CURRENT` mirror of the
//! latest one. Numbers only grow: the next number is one above both the
//! highest file on disk and the recorded high-water mark.

mod naming;
mod reader;
mod render;
mod service;

use std::fmt;

use serde::Serialize;

pub use self::naming::{SERIES_PREFIX, current_file_name, numbered_file_name, parse_number};
pub use self::reader::{RegistryEntry, parse_entries};
pub use self::render::{RULE_WIDTH, render_body};
pub use self::service::{RegistryService, SnapshotOutcome};

/// What a snapshot enumerates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum SnapshotScope {
    /// The whole active zone; in a partitioned store every category.
    All,
    /// One category, by name.
    Category(String),
}

impl fmt::Display for SnapshotScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Category(name) => write!(f, "category '{name}'"),
        }
    }
}
