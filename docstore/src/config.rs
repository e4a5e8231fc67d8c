//! Store settings loaded via OrthoConfig.
//!
//! Every field is optional; missing values fall back to the defaults in
//! [`crate::domain::layout`]. [`StoreSettings::into_config`] validates the
//! values and produces the immutable [`StoreConfig`] the services share.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use doc_name::{DEFAULT_YEAR_MAX, DEFAULT_YEAR_MIN, YearBounds};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::{
    Category, DEFAULT_ACTIVE_DIR, DEFAULT_ARCHIVE_DIR, DEFAULT_DRAFTS_DIR, DEFAULT_EXTENSIONS,
    DEFAULT_REGISTRIES_DIR, DEFAULT_RETENTION, LayoutError, StoreConfig,
};

const DEFAULT_DOCS_DIR: &str = "docs";

/// Errors raised while loading or validating settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read.
    #[error("failed to load settings: {message}")]
    Load {
        /// Loader message.
        message: String,
    },
    /// A directory path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the path.
        path: String,
    },
    /// The year range is inverted.
    #[error("year bounds are inverted: {min} > {max}")]
    InvalidYearBounds {
        /// Configured lower bound.
        min: u16,
        /// Configured upper bound.
        max: u16,
    },
    /// A category entry is not of the form `Name=dir`.
    #[error("category entry '{entry}' must look like 'Name=dir'")]
    MalformedCategory {
        /// Entry as written.
        entry: String,
    },
    /// The layout rejected a value.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Configuration values for a document store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DOCSTORE")]
pub struct StoreSettings {
    /// Root holding the zone directories.
    pub docs_dir: Option<PathBuf>,
    /// Drafts directory, relative to the root unless absolute.
    pub drafts_dir: Option<String>,
    /// Active directory, relative to the root unless absolute.
    pub active_dir: Option<String>,
    /// Archive directory, relative to the root unless absolute.
    pub archive_dir: Option<String>,
    /// Registries directory, relative to the root unless absolute.
    pub registries_dir: Option<String>,
    /// Numbered snapshots kept per series.
    #[ortho_config(default = DEFAULT_RETENTION)]
    pub retention: usize,
    /// Lowest accepted document year.
    pub year_min: Option<u16>,
    /// Highest accepted document year.
    pub year_max: Option<u16>,
    /// Scanned extensions, such as `docx,pdf`.
    #[serde(default, deserialize_with = "list_setting")]
    pub extensions: Option<Vec<String>>,
    /// `Name=dir` pairs partitioning the store, separated by `;` or `,`.
    #[serde(default, deserialize_with = "list_setting")]
    pub categories: Option<Vec<String>>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            docs_dir: None,
            drafts_dir: None,
            active_dir: None,
            archive_dir: None,
            registries_dir: None,
            retention: DEFAULT_RETENTION,
            year_min: None,
            year_max: None,
            extensions: None,
            categories: None,
        }
    }
}

/// Accepts a list setting written either as one string or as a sequence.
///
/// The environment layer turns `a,b` into a sequence but leaves `a` as a
/// plain string, so both shapes must deserialize.
fn list_setting<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(single) => single.split(',').map(str::to_owned).collect(),
        OneOrMany::Many(items) => items,
    }))
}

impl StoreSettings {
    /// Loads settings from the environment and configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be parsed.
    pub fn load(program: &str) -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(program)]).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Documents root, falling back to `docs`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonUtf8Path`] for a non-UTF-8 path.
    pub fn docs_dir(&self) -> Result<Utf8PathBuf, ConfigError> {
        self.docs_dir.clone().map_or_else(
            || Ok(Utf8PathBuf::from(DEFAULT_DOCS_DIR)),
            |path| {
                Utf8PathBuf::from_path_buf(path).map_err(|raw| ConfigError::NonUtf8Path {
                    path: raw.display().to_string(),
                })
            },
        )
    }

    /// Numbered snapshots kept per series.
    #[must_use]
    pub const fn retention(&self) -> usize {
        self.retention
    }

    /// Accepted year range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidYearBounds`] when the minimum exceeds
    /// the maximum.
    pub fn year_bounds(&self) -> Result<YearBounds, ConfigError> {
        let min = self.year_min.unwrap_or(DEFAULT_YEAR_MIN);
        let max = self.year_max.unwrap_or(DEFAULT_YEAR_MAX);
        YearBounds::new(min, max).ok_or(ConfigError::InvalidYearBounds { min, max })
    }

    /// Scanned extensions as written, defaults when unset.
    #[must_use]
    pub fn extensions(&self) -> Vec<String> {
        self.extensions.as_deref().map_or_else(
            || DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
            |list| {
                list.iter()
                    .map(String::as_str)
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(str::to_owned)
                    .collect()
            },
        )
    }

    /// Declared categories, empty for a flat store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedCategory`] for an entry without `=`
    /// and [`ConfigError::Layout`] for an invalid name or directory.
    pub fn categories(&self) -> Result<Vec<Category>, ConfigError> {
        let Some(list) = self.categories.as_deref() else {
            return Ok(Vec::new());
        };
        list.iter()
            .flat_map(|item| item.split(';'))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (name, dir) = entry
                    .split_once('=')
                    .ok_or_else(|| ConfigError::MalformedCategory {
                        entry: entry.to_owned(),
                    })?;
                Ok(Category::new(name.trim(), dir.trim())?)
            })
            .collect()
    }

    /// Builds the validated store layout.
    ///
    /// `root_override` replaces the configured documents root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for any value the layout rejects.
    pub fn into_config(self, root_override: Option<&Utf8Path>) -> Result<StoreConfig, ConfigError> {
        let root = root_override.map_or_else(|| self.docs_dir(), |root| Ok(root.to_path_buf()))?;
        let zone = |configured: Option<&str>, default: &str| root.join(configured.unwrap_or(default));
        let drafts = zone(self.drafts_dir.as_deref(), DEFAULT_DRAFTS_DIR);
        let active = zone(self.active_dir.as_deref(), DEFAULT_ACTIVE_DIR);
        let archive = zone(self.archive_dir.as_deref(), DEFAULT_ARCHIVE_DIR);
        let registries = zone(self.registries_dir.as_deref(), DEFAULT_REGISTRIES_DIR);

        Ok(StoreConfig::new(&root)
            .with_directories(drafts, active, archive, registries)
            .with_categories(self.categories()?)?
            .with_retention(self.retention())?
            .with_extensions(self.extensions())?
            .with_year_bounds(self.year_bounds()?))
    }
}
