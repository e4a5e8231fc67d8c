//! Non-recursive directory scanning.

use std::sync::Arc;

use camino::Utf8Path;
use doc_name::split_extension;
use tracing::debug;

use crate::domain::document::Document;
use crate::domain::error::StoreError;
use crate::domain::layout::{Category, StoreConfig, Zone};
use crate::domain::ports::DocumentFiles;

/// Lists and decodes documents in the store's zones.
pub struct DirectoryScanner<F> {
    files: Arc<F>,
    config: Arc<StoreConfig>,
}

impl<F> Clone for DirectoryScanner<F> {
    fn clone(&self) -> Self {
        Self {
            files: Arc::clone(&self.files),
            config: Arc::clone(&self.config),
        }
    }
}

impl<F: DocumentFiles> DirectoryScanner<F> {
    /// Creates a scanner reading through `files`.
    #[must_use]
    pub const fn new(files: Arc<F>, config: Arc<StoreConfig>) -> Self {
        Self { files, config }
    }

    /// Fails unless `dir` exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] naming the missing directory.
    pub fn require_dir(&self, dir: &Utf8Path) -> Result<(), StoreError> {
        if self.files.dir_exists(dir) {
            Ok(())
        } else {
            Err(StoreError::not_found(format!("directory {dir}")))
        }
    }

    /// Decodes every file in `dir` whose extension is allowed.
    ///
    /// Sub-directories are skipped and a missing directory yields an empty
    /// list. Results are ordered by filename.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be listed.
    pub fn scan(&self, dir: &Utf8Path) -> Result<Vec<Document>, StoreError> {
        let mut names = self.files.list_file_names(dir)?;
        names.retain(|name| self.config.allows_extension(split_extension(name).1));
        names.sort();
        debug!(dir = %dir, count = names.len(), "scanned directory");

        let bounds = self.config.year_bounds();
        Ok(names
            .into_iter()
            .map(|name| Document::new(name, dir, bounds))
            .collect())
    }

    /// Scans every configured category sub-directory of `root`, tagging each
    /// document with its category.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when a sub-directory cannot be listed.
    pub fn scan_categorized(&self, root: &Utf8Path) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        for category in self.config.categories() {
            documents.extend(self.scan_category(root, category)?);
        }
        documents.sort_by(|left, right| {
            left.file_name()
                .cmp(right.file_name())
                .then_with(|| left.category().cmp(&right.category()))
        });
        Ok(documents)
    }

    /// Scans a zone, resolving the directory from the store layout.
    ///
    /// Drafts are always scanned flat. In a partitioned store the active and
    /// archive zones are scanned per category: a named category scans its
    /// sub-directory, no category scans them all. A flat store rejects any
    /// category for those zones.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown category and
    /// [`StoreError::Io`] when listing fails.
    pub fn scan_zone(&self, zone: Zone, category: Option<&str>) -> Result<Vec<Document>, StoreError> {
        let root = self.config.zone_root(zone);
        if zone == Zone::Drafts {
            return self.scan(root);
        }
        match (category, self.config.is_partitioned()) {
            (None, false) => self.scan(root),
            (None, true) => self.scan_categorized(root),
            (Some(name), _) => {
                let found = self
                    .config
                    .category(name)
                    .ok_or_else(|| StoreError::not_found(format!("category '{name}'")))?;
                self.scan_category(root, found)
            }
        }
    }

    fn scan_category(
        &self,
        root: &Utf8Path,
        category: &Category,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.scan(&root.join(category.dir()))?;
        Ok(documents
            .into_iter()
            .map(|doc| doc.in_category(category.name()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{DocumentFilesError, MockDocumentFiles};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[fixture]
    fn partitioned() -> Arc<StoreConfig> {
        let categories = vec![
            Category::new("Процедуры", "PP").expect("valid category"),
            Category::new("Инструкции", "DI").expect("valid category"),
        ];
        Arc::new(
            StoreConfig::new("docs")
                .with_categories(categories)
                .expect("distinct categories"),
        )
    }

    #[test]
    fn scan_filters_extensions_and_sorts() {
        let mut files = MockDocumentFiles::new();
        files
            .expect_list_file_names()
            .with(eq(Utf8Path::new("docs/ДЕЙСТВУЮЩИЕ")))
            .return_once(|_| {
                Ok(names(&[
                    "РК.1-02-2021 Руководство.PDF",
                    "notes.txt",
                    "ПП.К2-01-2022 Управление.docx",
                    "desktop.ini",
                ]))
            });
        let scanner = DirectoryScanner::new(Arc::new(files), Arc::new(StoreConfig::new("docs")));

        let found = scanner
            .scan(Utf8Path::new("docs/ДЕЙСТВУЮЩИЕ"))
            .expect("scan succeeds");

        let listed: Vec<_> = found.iter().map(Document::file_name).collect();
        assert_eq!(
            listed,
            ["ПП.К2-01-2022 Управление.docx", "РК.1-02-2021 Руководство.PDF"]
        );
        assert!(found.iter().all(|doc| doc.category().is_none()));
    }

    #[test]
    fn listing_failures_surface_as_io_errors() {
        let mut files = MockDocumentFiles::new();
        files
            .expect_list_file_names()
            .return_once(|_| Err(DocumentFilesError::io("docs/АРХИВ", "permission denied")));
        let scanner = DirectoryScanner::new(Arc::new(files), Arc::new(StoreConfig::new("docs")));

        let err = scanner
            .scan(Utf8Path::new("docs/АРХИВ"))
            .expect_err("listing fails");
        assert_eq!(err, StoreError::io("docs/АРХИВ", "permission denied"));
    }

    #[rstest]
    fn categorized_scan_tags_documents(partitioned: Arc<StoreConfig>) {
        let mut files = MockDocumentFiles::new();
        files
            .expect_list_file_names()
            .with(eq(Utf8Path::new("docs/ДЕЙСТВУЮЩИЕ/PP")))
            .return_once(|_| Ok(names(&["ПП.1-01-2022 Б.docx"])));
        files
            .expect_list_file_names()
            .with(eq(Utf8Path::new("docs/ДЕЙСТВУЮЩИЕ/DI")))
            .return_once(|_| Ok(names(&["ДИ.1-01-2022 А.docx"])));
        let scanner = DirectoryScanner::new(Arc::new(files), partitioned);

        let found = scanner
            .scan_zone(Zone::Active, None)
            .expect("scan succeeds");

        let tagged: Vec<_> = found
            .iter()
            .map(|doc| (doc.file_name(), doc.category()))
            .collect();
        assert_eq!(
            tagged,
            [
                ("ДИ.1-01-2022 А.docx", Some("Инструкции")),
                ("ПП.1-01-2022 Б.docx", Some("Процедуры")),
            ]
        );
    }

    #[rstest]
    fn unknown_category_is_not_found(partitioned: Arc<StoreConfig>) {
        let scanner = DirectoryScanner::new(Arc::new(MockDocumentFiles::new()), partitioned);
        let err = scanner
            .scan_zone(Zone::Archive, Some("Приказы"))
            .expect_err("category is unknown");
        assert_eq!(err, StoreError::not_found("category 'Приказы'"));
    }

    #[rstest]
    fn drafts_ignore_partitioning(partitioned: Arc<StoreConfig>) {
        let mut files = MockDocumentFiles::new();
        files
            .expect_list_file_names()
            .with(eq(Utf8Path::new("docs/ПРОЕКТЫ")))
            .return_once(|_| Ok(Vec::new()));
        let scanner = DirectoryScanner::new(Arc::new(files), partitioned);

        let found = scanner
            .scan_zone(Zone::Drafts, Some("Процедуры"))
            .expect("scan succeeds");
        assert!(found.is_empty());
    }

    #[test]
    fn missing_directories_are_not_found() {
        let mut files = MockDocumentFiles::new();
        files
            .expect_dir_exists()
            .returning(|dir| dir != Utf8Path::new("docs/РЕЕСТРЫ"));
        let scanner = DirectoryScanner::new(Arc::new(files), Arc::new(StoreConfig::new("docs")));

        assert!(scanner.require_dir(Utf8Path::new("docs/ДЕЙСТВУЮЩИЕ")).is_ok());
        let err = scanner
            .require_dir(Utf8Path::new("docs/РЕЕСТРЫ"))
            .expect_err("directory is missing");
        assert_eq!(err, StoreError::not_found("directory docs/РЕЕСТРЫ"));
    }
}
