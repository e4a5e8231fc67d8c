//! Store layout: zone directories, categories, and scanning rules.
//!
//! A [`StoreConfig`] is an immutable value. Reconfiguring a store means
//! building a new value and new services around it.

use std::fmt;
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use doc_name::YearBounds;
use serde::Serialize;
use thiserror::Error;

/// Default drafts directory name under the documents root.
pub const DEFAULT_DRAFTS_DIR: &str = "ПРОЕКТЫ";
/// Default active directory name under the documents root.
pub const DEFAULT_ACTIVE_DIR: &str = "ДЕЙСТВУЮЩИЕ";
/// Default archive directory name under the documents root.
pub const DEFAULT_ARCHIVE_DIR: &str = "АРХИВ";
/// Default registries directory name under the documents root.
pub const DEFAULT_REGISTRIES_DIR: &str = "РЕЕСТРЫ";
/// Default number of numbered snapshots kept per series.
pub const DEFAULT_RETENTION: usize = 100;
/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".docx", ".doc", ".pdf"];

const DEFAULT_RETENTION_LIMIT: NonZeroUsize = match NonZeroUsize::new(DEFAULT_RETENTION) {
    Some(limit) => limit,
    None => NonZeroUsize::MIN,
};

/// The three document zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Work in progress, never partitioned.
    Drafts,
    /// Currently valid documents.
    Active,
    /// Superseded documents.
    Archive,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drafts => "drafts",
            Self::Active => "active",
            Self::Archive => "archive",
        })
    }
}

/// Errors raised while assembling a [`StoreConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A category name is blank.
    #[error("category name must not be empty")]
    EmptyCategoryName,
    /// A category directory is unusable as a sub-directory and series token.
    #[error("category directory '{dir}' must be non-empty and contain only ASCII letters, digits or '-'")]
    InvalidCategoryDir {
        /// Directory as supplied.
        dir: String,
    },
    /// Two categories share a name or directory.
    #[error("category '{value}' is declared twice")]
    DuplicateCategory {
        /// Repeated name or directory.
        value: String,
    },
    /// Retention must keep at least one snapshot.
    #[error("retention must be at least 1")]
    ZeroRetention,
    /// No extensions were supplied.
    #[error("at least one document extension is required")]
    NoExtensions,
    /// An extension is blank or contains a path separator or inner dot.
    #[error("invalid document extension '{extension}'")]
    InvalidExtension {
        /// Extension as supplied.
        extension: String,
    },
}

/// Named partition of the active and archive zones.
///
/// The directory name doubles as the category's registry series token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    name: String,
    dir: String,
}

impl Category {
    /// Creates a category after validating its name and directory.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the name is blank or the directory holds
    /// anything other than ASCII letters, digits and `-`.
    ///
    /// # Example
    ///
    /// ```
    /// use docstore::domain::Category;
    ///
    /// let category = Category::new("Процедуры", "PP").expect("valid category");
    /// assert_eq!(category.token(), "PP");
    /// assert!(Category::new("Процедуры", "P/P").is_err());
    /// ```
    pub fn new(name: impl Into<String>, dir: impl Into<String>) -> Result<Self, LayoutError> {
        let label = name.into().trim().to_owned();
        let dir_name = dir.into();
        if label.is_empty() {
            return Err(LayoutError::EmptyCategoryName);
        }
        let valid_dir = !dir_name.is_empty()
            && dir_name
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
        if !valid_dir {
            return Err(LayoutError::InvalidCategoryDir { dir: dir_name });
        }
        Ok(Self {
            name: label,
            dir: dir_name,
        })
    }

    /// Operator-facing name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sub-directory name inside the active and archive zones.
    #[must_use]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Token used in the category's registry series name.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.dir
    }
}

/// Immutable description of a document store on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    drafts_dir: Utf8PathBuf,
    active_dir: Utf8PathBuf,
    archive_dir: Utf8PathBuf,
    registries_dir: Utf8PathBuf,
    categories: Vec<Category>,
    retention: NonZeroUsize,
    extensions: Vec<String>,
    year_bounds: YearBounds,
}

impl StoreConfig {
    /// Creates a flat store rooted at `docs_dir` with default directory
    /// names, retention, extensions and year bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use docstore::domain::{StoreConfig, Zone};
    ///
    /// let config = StoreConfig::new("docs");
    /// assert_eq!(config.zone_root(Zone::Active), "docs/ДЕЙСТВУЮЩИЕ");
    /// assert!(!config.is_partitioned());
    /// ```
    #[must_use]
    pub fn new(docs_dir: impl AsRef<Utf8Path>) -> Self {
        let root = docs_dir.as_ref();
        Self {
            drafts_dir: root.join(DEFAULT_DRAFTS_DIR),
            active_dir: root.join(DEFAULT_ACTIVE_DIR),
            archive_dir: root.join(DEFAULT_ARCHIVE_DIR),
            registries_dir: root.join(DEFAULT_REGISTRIES_DIR),
            categories: Vec::new(),
            retention: DEFAULT_RETENTION_LIMIT,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
            year_bounds: YearBounds::default(),
        }
    }

    /// Replaces the zone directories.
    #[must_use]
    pub fn with_directories(
        self,
        drafts: Utf8PathBuf,
        active: Utf8PathBuf,
        archive: Utf8PathBuf,
        registries: Utf8PathBuf,
    ) -> Self {
        Self {
            drafts_dir: drafts,
            active_dir: active,
            archive_dir: archive,
            registries_dir: registries,
            ..self
        }
    }

    /// Partitions the active and archive zones into `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateCategory`] when two categories share
    /// a name or a directory.
    pub fn with_categories(self, categories: Vec<Category>) -> Result<Self, LayoutError> {
        for (index, category) in categories.iter().enumerate() {
            let clash = categories.iter().skip(index + 1).find_map(|other| {
                if other.name == category.name {
                    Some(category.name.clone())
                } else if other.dir == category.dir {
                    Some(category.dir.clone())
                } else {
                    None
                }
            });
            if let Some(value) = clash {
                return Err(LayoutError::DuplicateCategory { value });
            }
        }
        Ok(Self { categories, ..self })
    }

    /// Sets how many numbered snapshots each series keeps.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroRetention`] for zero.
    pub fn with_retention(self, retention: usize) -> Result<Self, LayoutError> {
        let limit = NonZeroUsize::new(retention).ok_or(LayoutError::ZeroRetention)?;
        Ok(Self {
            retention: limit,
            ..self
        })
    }

    /// Sets the scanned extensions. Entries are normalised to lowercase with
    /// a leading dot.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the list is empty or an entry is not a
    /// plain extension.
    pub fn with_extensions<I, S>(self, extensions: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalised = extensions
            .into_iter()
            .map(|raw| normalise_extension(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if normalised.is_empty() {
            return Err(LayoutError::NoExtensions);
        }
        Ok(Self {
            extensions: normalised,
            ..self
        })
    }

    /// Sets the accepted year range.
    #[must_use]
    pub fn with_year_bounds(self, year_bounds: YearBounds) -> Self {
        Self {
            year_bounds,
            ..self
        }
    }

    /// Root directory of a zone.
    #[must_use]
    pub fn zone_root(&self, zone: Zone) -> &Utf8Path {
        match zone {
            Zone::Drafts => &self.drafts_dir,
            Zone::Active => &self.active_dir,
            Zone::Archive => &self.archive_dir,
        }
    }

    /// Directory holding `category` inside `zone`. Drafts are never
    /// partitioned, so the category is ignored there.
    #[must_use]
    pub fn zone_dir(&self, zone: Zone, category: Option<&Category>) -> Utf8PathBuf {
        let root = self.zone_root(zone);
        match (zone, category) {
            (Zone::Drafts, _) | (_, None) => root.to_path_buf(),
            (_, Some(found)) => root.join(found.dir()),
        }
    }

    /// Directory holding registry snapshots.
    #[must_use]
    pub fn registries_dir(&self) -> &Utf8Path {
        &self.registries_dir
    }

    /// Declared categories, in configuration order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Whether the active and archive zones are split into categories.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Looks a category up by name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Numbered snapshots kept per series.
    #[must_use]
    pub const fn retention(&self) -> NonZeroUsize {
        self.retention
    }

    /// Scanned extensions, lowercase with leading dot.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Accepted publication years.
    #[must_use]
    pub const fn year_bounds(&self) -> YearBounds {
        self.year_bounds
    }

    /// Whether `extension` (with its dot) is scanned, ignoring case.
    #[must_use]
    pub fn allows_extension(&self, extension: &str) -> bool {
        let lowered = extension.to_lowercase();
        self.extensions.iter().any(|allowed| *allowed == lowered)
    }

    /// Every directory the store expects to exist.
    #[must_use]
    pub fn all_directories(&self) -> Vec<Utf8PathBuf> {
        let mut dirs = vec![
            self.drafts_dir.clone(),
            self.active_dir.clone(),
            self.archive_dir.clone(),
            self.registries_dir.clone(),
        ];
        for zone in [Zone::Active, Zone::Archive] {
            dirs.extend(
                self.categories
                    .iter()
                    .map(|category| self.zone_dir(zone, Some(category))),
            );
        }
        dirs
    }
}

fn normalise_extension(raw: &str) -> Result<String, LayoutError> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    let invalid = bare.is_empty()
        || bare
            .chars()
            .any(|ch| matches!(ch, '.' | '/' | '\\') || ch.is_whitespace());
    if invalid {
        return Err(LayoutError::InvalidExtension {
            extension: raw.to_owned(),
        });
    }
    Ok(format!(".{}", bare.to_lowercase()))
}
