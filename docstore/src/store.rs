//! The document store: adapters wired to services behind one lock.
//!
//! Reads share the lock, mutations (publish and snapshot issuing) take it
//! exclusively, so two publishes in one process never interleave and a
//! snapshot never observes a half-finished publish. Other processes are not
//! coordinated.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use doc_name::DocumentIdentity;
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use tracing::info;

use crate::domain::ports::{DocumentFiles, SnapshotSequence, SnapshotStore};
use crate::domain::{
    Comparison, DirectoryScanner, Document, PublishError, PublishReport, PublishRequest,
    PublishService, PublishStage, RegistryEntry, RegistryService, SnapshotOutcome, SnapshotScope,
    StoreConfig, StoreError, Zone, compare, find_similar,
};
use crate::outbound::fs::{FsDocumentFiles, FsSnapshotSequence, FsSnapshotStore};

/// An active document resembling a draft, with the field breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarDocument {
    /// Matching active document.
    pub document: Document,
    /// Field-by-field comparison with the draft as the left-hand side.
    pub comparison: Comparison,
}

/// Facade over the scanner, registry and publish services.
pub struct DocumentStore<F = FsDocumentFiles, S = FsSnapshotStore, Q = FsSnapshotSequence> {
    config: Arc<StoreConfig>,
    files: Arc<F>,
    scanner: DirectoryScanner<F>,
    registry: RegistryService<F, S, Q>,
    publisher: PublishService<F, S, Q>,
    lock: RwLock<()>,
}

impl DocumentStore {
    /// Opens a store on the local filesystem.
    ///
    /// Snapshots and their sequence marks live in the registries directory.
    #[must_use]
    pub fn open(config: StoreConfig) -> Self {
        let registries = config.registries_dir().to_path_buf();
        Self::with_adapters(
            config,
            Arc::new(FsDocumentFiles::new()),
            Arc::new(FsSnapshotStore::new(registries.clone())),
            Arc::new(FsSnapshotSequence::new(registries)),
            Arc::new(DefaultClock),
        )
    }
}

impl<F, S, Q> DocumentStore<F, S, Q>
where
    F: DocumentFiles,
    S: SnapshotStore,
    Q: SnapshotSequence,
{
    /// Builds a store over arbitrary port implementations.
    #[must_use]
    pub fn with_adapters(
        config: StoreConfig,
        files: Arc<F>,
        snapshots: Arc<S>,
        sequence: Arc<Q>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let shared = Arc::new(config);
        let scanner = DirectoryScanner::new(Arc::clone(&files), Arc::clone(&shared));
        let registry = RegistryService::new(
            scanner.clone(),
            snapshots,
            sequence,
            Arc::clone(&shared),
            clock,
        );
        let publisher =
            PublishService::new(Arc::clone(&files), Arc::clone(&shared), registry.clone());
        Self {
            config: shared,
            files,
            scanner,
            registry,
            publisher,
            lock: RwLock::new(()),
        }
    }

    /// Layout the store was opened with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates every zone and category directory that is missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when a directory cannot be created.
    pub fn init(&self) -> Result<(), StoreError> {
        let _guard = self.write();
        for dir in self.config.all_directories() {
            self.files.create_dir_all(&dir)?;
        }
        info!(root = %self.config.zone_root(Zone::Drafts), "store directories ready");
        Ok(())
    }

    /// Lists the documents of `zone`, optionally narrowed to a category.
    ///
    /// # Errors
    ///
    /// See [`DirectoryScanner::scan_zone`].
    pub fn scan_zone(&self, zone: Zone, category: Option<&str>) -> Result<Vec<Document>, StoreError> {
        let _guard = self.read();
        self.scanner.scan_zone(zone, category)
    }

    /// Finds the draft named `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no such draft exists.
    pub fn draft(&self, file_name: &str) -> Result<Document, StoreError> {
        let _guard = self.read();
        self.find_draft(file_name)
    }

    /// Active documents sharing a code or title with the draft `file_name`,
    /// each with its comparison against the draft.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown draft and
    /// [`StoreError::Io`] when a zone cannot be scanned.
    pub fn similar(&self, file_name: &str) -> Result<Vec<SimilarDocument>, StoreError> {
        let _guard = self.read();
        let draft = self.find_draft(file_name)?;
        let active = self.scanner.scan_zone(Zone::Active, None)?;
        Ok(find_similar(&draft, &active)
            .into_iter()
            .map(|document| SimilarDocument {
                comparison: compare(&draft, document),
                document: document.clone(),
            })
            .collect())
    }

    /// Runs a publish transaction.
    ///
    /// # Errors
    ///
    /// See [`PublishService::publish`].
    pub fn publish(&self, request: &PublishRequest) -> Result<PublishReport, PublishError> {
        let _guard = self.write();
        self.publisher.publish(request)
    }

    /// Publishes the draft `draft` as `identity`, archiving the active
    /// documents named in `archive`.
    ///
    /// An archived name present in several categories resolves to the copy
    /// in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] at [`PublishStage::Drafted`] when a named
    /// file cannot be found, otherwise see [`PublishService::publish`].
    pub fn publish_draft(
        &self,
        draft: &str,
        identity: DocumentIdentity,
        category: Option<String>,
        archive: &[String],
    ) -> Result<PublishReport, PublishError> {
        let _guard = self.write();
        let request = self
            .resolve_request(draft, identity, category, archive)
            .map_err(|source| PublishError {
                stage: PublishStage::Drafted,
                source,
            })?;
        self.publisher.publish(&request)
    }

    /// Issues a snapshot of `scope` on operator request.
    ///
    /// # Errors
    ///
    /// See [`RegistryService::create_snapshot`].
    pub fn refresh(&self, scope: &SnapshotScope) -> Result<SnapshotOutcome, StoreError> {
        let _guard = self.write();
        self.registry.manual_refresh(scope)
    }

    /// Issues a snapshot of every scope.
    ///
    /// # Errors
    ///
    /// See [`RegistryService::refresh_all`].
    pub fn refresh_all(&self) -> Result<Vec<SnapshotOutcome>, StoreError> {
        let _guard = self.write();
        self.registry.refresh_all()
    }

    /// Body of the latest snapshot of `scope`.
    ///
    /// # Errors
    ///
    /// See [`RegistryService::current_body`].
    pub fn current_body(&self, scope: &SnapshotScope) -> Result<Option<String>, StoreError> {
        let _guard = self.read();
        self.registry.current_body(scope)
    }

    /// Rows of the latest snapshot of `scope`.
    ///
    /// # Errors
    ///
    /// See [`RegistryService::current_entries`].
    pub fn current_entries(&self, scope: &SnapshotScope) -> Result<Vec<RegistryEntry>, StoreError> {
        let _guard = self.read();
        self.registry.current_entries(scope)
    }

    fn find_draft(&self, file_name: &str) -> Result<Document, StoreError> {
        self.scanner
            .scan_zone(Zone::Drafts, None)?
            .into_iter()
            .find(|doc| doc.file_name() == file_name)
            .ok_or_else(|| StoreError::not_found(format!("draft '{file_name}'")))
    }

    fn resolve_request(
        &self,
        draft: &str,
        identity: DocumentIdentity,
        category: Option<String>,
        archive: &[String],
    ) -> Result<PublishRequest, StoreError> {
        let source = self.find_draft(draft)?;
        let superseded = if archive.is_empty() {
            Vec::new()
        } else {
            let active = self.scanner.scan_zone(Zone::Active, None)?;
            archive
                .iter()
                .map(|name| pick_active(&active, name, category.as_deref()))
                .collect::<Result<_, _>>()?
        };
        Ok(PublishRequest {
            source,
            identity,
            category,
            archive: superseded,
        })
    }
}

fn pick_active(active: &[Document], name: &str, category: Option<&str>) -> Result<Document, StoreError> {
    let matching: Vec<&Document> = active.iter().filter(|doc| doc.file_name() == name).collect();
    matching
        .iter()
        .find(|doc| category.is_some() && doc.category() == category)
        .or_else(|| matching.first())
        .map(|doc| (*doc).clone())
        .ok_or_else(|| StoreError::not_found(format!("active document '{name}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use camino::Utf8Path;
    use chrono::{Local, TimeZone};
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::Category;
    use crate::domain::ports::{MockDocumentFiles, SnapshotSequenceError, SnapshotStoreError};

    #[derive(Default)]
    struct MemorySnapshots(Mutex<BTreeMap<String, String>>);

    impl SnapshotStore for MemorySnapshots {
        fn list_names(&self) -> Result<Vec<String>, SnapshotStoreError> {
            Ok(self.0.lock().expect("lock").keys().cloned().collect())
        }

        fn write_atomic(&self, name: &str, body: &str) -> Result<(), SnapshotStoreError> {
            self.0
                .lock()
                .expect("lock")
                .insert(name.to_owned(), body.to_owned());
            Ok(())
        }

        fn read(&self, name: &str) -> Result<Option<String>, SnapshotStoreError> {
            Ok(self.0.lock().expect("lock").get(name).cloned())
        }

        fn remove(&self, name: &str) -> Result<(), SnapshotStoreError> {
            self.0.lock().expect("lock").remove(name);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemorySequence(Mutex<BTreeMap<String, u32>>);

    impl SnapshotSequence for MemorySequence {
        fn last_issued(&self, series: &str) -> Result<u32, SnapshotSequenceError> {
            Ok(self.0.lock().expect("lock").get(series).copied().unwrap_or(0))
        }

        fn record_issued(&self, series: &str, number: u32) -> Result<(), SnapshotSequenceError> {
            let mut marks = self.0.lock().expect("lock");
            let mark = marks.entry(series.to_owned()).or_default();
            *mark = (*mark).max(number);
            Ok(())
        }
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_local().returning(|| {
            Local
                .with_ymd_and_hms(2024, 3, 9, 14, 5, 0)
                .single()
                .expect("unambiguous local time")
        });
        Arc::new(clock)
    }

    fn listing(dir: &Utf8Path) -> Vec<String> {
        let names: &[&str] = match dir.as_str() {
            "docs/ПРОЕКТЫ" => &["ПП.К2-8.3-02-2024 Управление документацией.docx"],
            "docs/ДЕЙСТВУЮЩИЕ/PP" => &[
                "ПП.К2-8.3-01-2022 Управление документацией.docx",
                "ПП.К4-01-2022 Закупки.docx",
            ],
            "docs/ДЕЙСТВУЮЩИЕ/DI" => &["ДИ.К2-8.3-01-2023 Управление документацией.pdf"],
            _ => &[],
        };
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[fixture]
    fn store() -> DocumentStore<MockDocumentFiles, MemorySnapshots, MemorySequence> {
        let config = StoreConfig::new("docs")
            .with_categories(vec![
                Category::new("Процедуры", "PP").expect("valid category"),
                Category::new("Инструкции", "DI").expect("valid category"),
            ])
            .expect("distinct categories");
        let mut files = MockDocumentFiles::new();
        files.expect_dir_exists().returning(|_| true);
        files
            .expect_list_file_names()
            .returning(|dir| Ok(listing(dir)));
        DocumentStore::with_adapters(
            config,
            Arc::new(files),
            Arc::new(MemorySnapshots::default()),
            Arc::new(MemorySequence::default()),
            fixed_clock(),
        )
    }

    #[rstest]
    fn similar_spans_every_category(
        store: DocumentStore<MockDocumentFiles, MemorySnapshots, MemorySequence>,
    ) {
        let similar = store
            .similar("ПП.К2-8.3-02-2024 Управление документацией.docx")
            .expect("draft exists");

        let found: Vec<_> = similar
            .iter()
            .map(|item| (item.document.category(), item.comparison.matches.len()))
            .collect();
        assert_eq!(found, [(Some("Инструкции"), 2), (Some("Процедуры"), 3)]);
    }

    #[rstest]
    fn comparisons_put_the_draft_on_the_left(
        store: DocumentStore<MockDocumentFiles, MemorySnapshots, MemorySequence>,
    ) {
        let similar = store
            .similar("ПП.К2-8.3-02-2024 Управление документацией.docx")
            .expect("draft exists");

        let differences: Vec<_> = similar
            .iter()
            .filter(|item| item.document.category() == Some("Процедуры"))
            .flat_map(|item| item.comparison.differences.iter().map(ToString::to_string))
            .collect();
        assert_eq!(differences, ["ВЕРСИЯ(02≠01)", "ГОД(2024≠2022)"]);
    }

    #[rstest]
    fn unknown_draft_is_not_found(
        store: DocumentStore<MockDocumentFiles, MemorySnapshots, MemorySequence>,
    ) {
        let error = store.similar("missing.docx").expect_err("no such draft");
        assert_eq!(error, StoreError::not_found("draft 'missing.docx'"));
    }

    #[rstest]
    fn unknown_archive_name_stops_before_any_write(
        store: DocumentStore<MockDocumentFiles, MemorySnapshots, MemorySequence>,
    ) {
        let identity = DocumentIdentity {
            doc_type: "ПП".to_owned(),
            code: "К2-8.3".to_owned(),
            version: "02".to_owned(),
            year: 2024,
            title: "Управление документацией".to_owned(),
        };

        let error = store
            .publish_draft(
                "ПП.К2-8.3-02-2024 Управление документацией.docx",
                identity,
                Some("Процедуры".to_owned()),
                &["ПП.К9-01-2020 Нет.docx".to_owned()],
            )
            .expect_err("archive target is unknown");

        assert_eq!(error.stage, PublishStage::Drafted);
        assert_eq!(
            error.source,
            StoreError::not_found("active document 'ПП.К9-01-2020 Нет.docx'")
        );
    }

    #[rstest]
    fn refresh_all_then_reads_back_entries(
        store: DocumentStore<MockDocumentFiles, MemorySnapshots, MemorySequence>,
    ) {
        let outcomes = store.refresh_all().expect("snapshots issued");
        assert_eq!(outcomes.len(), 3);

        let entries = store
            .current_entries(&SnapshotScope::Category("Процедуры".to_owned()))
            .expect("mirror readable");
        let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "ПП.К2-8.3-01-2022 Управление документацией",
                "ПП.К4-01-2022 Закупки",
            ]
        );
    }

    #[test]
    fn archive_lookup_prefers_the_requested_category() {
        let bounds = doc_name::YearBounds::default();
        let active = vec![
            Document::new("ПП.1-01-2022 Итог.docx", "docs/ДЕЙСТВУЮЩИЕ/DI", bounds)
                .in_category("Инструкции"),
            Document::new("ПП.1-01-2022 Итог.docx", "docs/ДЕЙСТВУЮЩИЕ/PP", bounds)
                .in_category("Процедуры"),
        ];

        let picked = pick_active(&active, "ПП.1-01-2022 Итог.docx", Some("Процедуры"))
            .expect("present");
        assert_eq!(picked.category(), Some("Процедуры"));

        let fallback =
            pick_active(&active, "ПП.1-01-2022 Итог.docx", None).expect("present");
        assert_eq!(fallback.category(), Some("Инструкции"));
    }
}
