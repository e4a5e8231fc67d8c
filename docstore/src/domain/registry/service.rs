//! Registry snapshot issuing, mirroring and pruning.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::info;

use super::naming::{current_file_name, numbered_file_name, parse_number, series_name};
use super::reader::{RegistryEntry, parse_entries};
use super::render::render_body;
use super::SnapshotScope;
use crate::domain::document::Document;
use crate::domain::error::StoreError;
use crate::domain::layout::{Category, StoreConfig, Zone};
use crate::domain::ports::{DocumentFiles, SnapshotSequence, SnapshotStore};
use crate::domain::scanner::DirectoryScanner;

/// Result of issuing one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotOutcome {
    /// Scope the snapshot enumerates.
    pub scope: SnapshotScope,
    /// Number issued.
    pub version: u32,
    /// Numbered file written.
    pub file_name: String,
    /// Number of documents listed.
    pub entries: usize,
    /// Numbered files deleted by retention.
    pub pruned: Vec<String>,
}

/// Issues and reads registry snapshots.
pub struct RegistryService<F, S, Q> {
    scanner: DirectoryScanner<F>,
    snapshots: Arc<S>,
    sequence: Arc<Q>,
    config: Arc<StoreConfig>,
    clock: Arc<dyn Clock>,
}

impl<F, S, Q> Clone for RegistryService<F, S, Q> {
    fn clone(&self) -> Self {
        Self {
            scanner: self.scanner.clone(),
            snapshots: Arc::clone(&self.snapshots),
            sequence: Arc::clone(&self.sequence),
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<F, S, Q> RegistryService<F, S, Q>
where
    F: DocumentFiles,
    S: SnapshotStore,
    Q: SnapshotSequence,
{
    /// Creates a service issuing snapshots of the zones `scanner` reads.
    #[must_use]
    pub const fn new(
        scanner: DirectoryScanner<F>,
        snapshots: Arc<S>,
        sequence: Arc<Q>,
        config: Arc<StoreConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scanner,
            snapshots,
            sequence,
            config,
            clock,
        }
    }

    /// Issues the next snapshot of `scope`.
    ///
    /// The numbered file is written first, then the high-water mark, then
    /// the `CURRENT` mirror, and finally numbered files beyond the retention
    /// limit are deleted oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown category or when the
    /// registries directory or the scope's active directory is missing, and
    /// [`StoreError::Io`] when scanning, writing or pruning fails.
    pub fn create_snapshot(&self, scope: &SnapshotScope) -> Result<SnapshotOutcome, StoreError> {
        let category = self.resolve(scope)?;
        self.scanner.require_dir(self.config.registries_dir())?;
        self.scanner
            .require_dir(&self.config.zone_dir(Zone::Active, category))?;
        let series = series_name(category.map(Category::token));
        let version = self.next_version(&series)?;

        let entries = self.entries_for(category)?;
        let now = self.clock.local();
        let body = render_body(
            version,
            now.naive_local(),
            category.map(Category::name),
            &entries,
        );

        let file_name = numbered_file_name(&series, version, now.date_naive());
        self.snapshots.write_atomic(&file_name, &body)?;
        self.sequence.record_issued(&series, version)?;
        self.snapshots
            .write_atomic(&current_file_name(&series), &body)?;
        let pruned = self.prune(&series)?;

        info!(
            scope = %scope,
            version,
            file = %file_name,
            entries = entries.len(),
            pruned = pruned.len(),
            "registry snapshot issued"
        );
        Ok(SnapshotOutcome {
            scope: scope.clone(),
            version,
            file_name,
            entries: entries.len(),
            pruned,
        })
    }

    /// Issues a snapshot on operator request, outside any publish.
    ///
    /// # Errors
    ///
    /// See [`Self::create_snapshot`].
    pub fn manual_refresh(&self, scope: &SnapshotScope) -> Result<SnapshotOutcome, StoreError> {
        info!(scope = %scope, "manual registry refresh requested");
        self.create_snapshot(scope)
    }

    /// Issues a snapshot of the whole store and, in a partitioned store, of
    /// every category.
    ///
    /// # Errors
    ///
    /// Stops at the first failing scope; see [`Self::create_snapshot`].
    pub fn refresh_all(&self) -> Result<Vec<SnapshotOutcome>, StoreError> {
        self.all_scopes()
            .iter()
            .map(|scope| self.manual_refresh(scope))
            .collect()
    }

    /// Every scope the store maintains a series for.
    #[must_use]
    pub fn all_scopes(&self) -> Vec<SnapshotScope> {
        let mut scopes = vec![SnapshotScope::All];
        scopes.extend(
            self.config
                .categories()
                .iter()
                .map(|category| SnapshotScope::Category(category.name().to_owned())),
        );
        scopes
    }

    /// Body of the latest snapshot of `scope`, `None` before the first one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown category and
    /// [`StoreError::Io`] when the mirror cannot be read.
    pub fn current_body(&self, scope: &SnapshotScope) -> Result<Option<String>, StoreError> {
        let category = self.resolve(scope)?;
        let series = series_name(category.map(Category::token));
        Ok(self.snapshots.read(&current_file_name(&series))?)
    }

    /// Rows of the latest snapshot of `scope`, empty before the first one.
    ///
    /// # Errors
    ///
    /// See [`Self::current_body`].
    pub fn current_entries(&self, scope: &SnapshotScope) -> Result<Vec<RegistryEntry>, StoreError> {
        Ok(self
            .current_body(scope)?
            .map(|body| parse_entries(&body))
            .unwrap_or_default())
    }

    fn resolve(&self, scope: &SnapshotScope) -> Result<Option<&Category>, StoreError> {
        match scope {
            SnapshotScope::All => Ok(None),
            SnapshotScope::Category(name) => self
                .config
                .category(name)
                .map(Some)
                .ok_or_else(|| StoreError::not_found(format!("category '{name}'"))),
        }
    }

    fn numbered_files(&self, series: &str) -> Result<Vec<(u32, String)>, StoreError> {
        let mut numbered: Vec<_> = self
            .snapshots
            .list_names()?
            .into_iter()
            .filter_map(|name| parse_number(series, &name).map(|number| (number, name)))
            .collect();
        numbered.sort();
        Ok(numbered)
    }

    fn next_version(&self, series: &str) -> Result<u32, StoreError> {
        let on_disk = self
            .numbered_files(series)?
            .last()
            .map_or(0, |(number, _)| *number);
        let recorded = self.sequence.last_issued(series)?;
        on_disk
            .max(recorded)
            .checked_add(1)
            .ok_or_else(|| StoreError::io(series, "snapshot numbers exhausted"))
    }

    fn entries_for(&self, category: Option<&Category>) -> Result<Vec<String>, StoreError> {
        let documents = self
            .scanner
            .scan_zone(Zone::Active, category.map(Category::name))?;
        let prefix_categories = category.is_none() && self.config.is_partitioned();
        let mut rows: Vec<(String, &Document)> = documents
            .iter()
            .map(|doc| {
                let name = doc.registry_name();
                let row = match doc.category() {
                    Some(label) if prefix_categories => format!("[{label}] {name}"),
                    _ => name,
                };
                (row, doc)
            })
            .collect();
        rows.sort_by(|(left, left_doc), (right, right_doc)| {
            left.cmp(right)
                .then_with(|| left_doc.file_name().cmp(right_doc.file_name()))
        });
        Ok(rows.into_iter().map(|(row, _)| row).collect())
    }

    fn prune(&self, series: &str) -> Result<Vec<String>, StoreError> {
        let numbered = self.numbered_files(series)?;
        let excess = numbered
            .len()
            .saturating_sub(self.config.retention().get());
        let mut pruned = Vec::with_capacity(excess);
        for (_, name) in numbered.into_iter().take(excess) {
            self.snapshots.remove(&name)?;
            info!(file = %name, "pruned registry snapshot");
            pruned.push(name);
        }
        Ok(pruned)
    }
}
