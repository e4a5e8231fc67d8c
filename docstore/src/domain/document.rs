//! Documents discovered on disk.

use camino::{Utf8Path, Utf8PathBuf};
use doc_name::{DecodedName, YearBounds, decode, encode, split_extension};
use serde::Serialize;

/// A file found in one of the zones, decoded on the spot.
///
/// Documents are rebuilt on every scan and never cached; the filesystem is
/// the only source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    file_name: String,
    directory: Utf8PathBuf,
    name: DecodedName,
    category: Option<String>,
}

impl Document {
    /// Decodes `file_name` found in `directory`.
    ///
    /// # Example
    ///
    /// ```
    /// use doc_name::YearBounds;
    /// use docstore::domain::Document;
    ///
    /// let doc = Document::new(
    ///     "ПП.К2-8.3-01-2022 Управление документацией.docx",
    ///     "docs/ПРОЕКТЫ",
    ///     YearBounds::default(),
    /// );
    /// assert!(doc.is_valid());
    /// assert_eq!(doc.path(), "docs/ПРОЕКТЫ/ПП.К2-8.3-01-2022 Управление документацией.docx");
    /// ```
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        directory: impl Into<Utf8PathBuf>,
        bounds: YearBounds,
    ) -> Self {
        let raw = file_name.into();
        let name = decode(&raw, bounds);
        Self {
            file_name: raw,
            directory: directory.into(),
            name,
            category: None,
        }
    }

    /// Tags the document with the category whose sub-directory held it.
    #[must_use]
    pub fn in_category(self, category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..self
        }
    }

    /// Filename including extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Directory the document was found in.
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Decoded identity fields.
    #[must_use]
    pub const fn name(&self) -> &DecodedName {
        &self.name
    }

    /// Category label, present only for documents found in a category
    /// sub-directory.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the filename decoded into a complete identity.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.name.is_valid
    }

    /// Extension with its leading dot, empty when there is none.
    #[must_use]
    pub fn extension(&self) -> &str {
        split_extension(&self.file_name).1
    }

    /// Name as listed in a registry: the encoded identity without extension
    /// for valid documents, the raw filename otherwise.
    #[must_use]
    pub fn registry_name(&self) -> String {
        self.name
            .identity()
            .map_or_else(|| self.file_name.clone(), |identity| encode(&identity))
    }
}
