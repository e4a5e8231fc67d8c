//! Publishing a draft: promote it to the active zone, archive what it
//! supersedes, and regenerate the affected registries.
//!
//! The transaction is a linear state machine:
//!
//! ```text
//! Drafted -> Copied -> Promoted -> Archived -> SnapshotTaken
//! ```
//!
//! Every precondition is checked before the first file is touched. Once a
//! step fails the remaining steps are skipped and completed ones stay done;
//! [`PublishError::stage`] names the last state reached. A failing registry
//! snapshot does not fail the publish and is reported as a warning instead.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use doc_name::{DocumentIdentity, file_name};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::document::Document;
use crate::domain::error::StoreError;
use crate::domain::layout::{Category, StoreConfig, Zone};
use crate::domain::ports::{DocumentFiles, SnapshotSequence, SnapshotStore};
use crate::domain::registry::{RegistryService, SnapshotOutcome, SnapshotScope};

/// States of a publish transaction, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStage {
    /// Preconditions hold; nothing has been written.
    Drafted,
    /// The draft has been copied into the active zone.
    Copied,
    /// The draft has been deleted.
    Promoted,
    /// Superseded documents have been moved to the archive.
    Archived,
    /// Every affected registry has a fresh snapshot.
    SnapshotTaken,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drafted => "drafted",
            Self::Copied => "copied",
            Self::Promoted => "promoted",
            Self::Archived => "archived",
            Self::SnapshotTaken => "snapshot taken",
        })
    }
}

/// What to publish and what it supersedes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Draft to promote.
    pub source: Document,
    /// Identity the published file will carry.
    pub identity: DocumentIdentity,
    /// Target category; required in a partitioned store.
    pub category: Option<String>,
    /// Active documents to move to the archive.
    pub archive: Vec<Document>,
}

/// A publish that stopped part-way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("publish stopped at stage '{stage}': {source}")]
pub struct PublishError {
    /// Last state reached before the failure.
    pub stage: PublishStage,
    /// Underlying failure.
    #[source]
    pub source: StoreError,
}

/// Outcome of a completed publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Final state: [`PublishStage::SnapshotTaken`], or
    /// [`PublishStage::Archived`] when a snapshot failed.
    pub stage: PublishStage,
    /// Path of the published file.
    pub published: Utf8PathBuf,
    /// New paths of the archived documents.
    pub archived: Vec<Utf8PathBuf>,
    /// Snapshots issued afterwards.
    pub snapshots: Vec<SnapshotOutcome>,
    /// Snapshot failures that did not fail the publish.
    pub warnings: Vec<String>,
}

struct ArchiveMove {
    from: Utf8PathBuf,
    to: Utf8PathBuf,
}

struct PublishPlan {
    destination: Utf8PathBuf,
    moves: Vec<ArchiveMove>,
    scopes: Vec<SnapshotScope>,
}

/// Tracks the current state and logs every transition.
struct Transaction<'a> {
    stage: PublishStage,
    file_name: &'a str,
}

impl<'a> Transaction<'a> {
    const fn start(file_name: &'a str) -> Self {
        Self {
            stage: PublishStage::Drafted,
            file_name,
        }
    }

    fn advance(&mut self, next: PublishStage) {
        info!(file = %self.file_name, from = %self.stage, to = %next, "publish stage reached");
        self.stage = next;
    }

    fn fail(&self, source: StoreError) -> PublishError {
        warn!(file = %self.file_name, stage = %self.stage, error = %source, "publish aborted");
        PublishError {
            stage: self.stage,
            source,
        }
    }
}

/// Runs publish transactions against the store.
pub struct PublishService<F, S, Q> {
    files: Arc<F>,
    config: Arc<StoreConfig>,
    registry: RegistryService<F, S, Q>,
}

impl<F, S, Q> PublishService<F, S, Q>
where
    F: DocumentFiles,
    S: SnapshotStore,
    Q: SnapshotSequence,
{
    /// Creates a service moving files through `files` and regenerating
    /// registries through `registry`.
    #[must_use]
    pub const fn new(
        files: Arc<F>,
        config: Arc<StoreConfig>,
        registry: RegistryService<F, S, Q>,
    ) -> Self {
        Self {
            files,
            config,
            registry,
        }
    }

    /// Publishes `request.source` under `request.identity`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] at [`PublishStage::Drafted`] when a
    /// precondition fails (invalid identity, unknown or missing category,
    /// missing draft or directory, occupied destination) and at a later
    /// stage when a file operation fails.
    pub fn publish(&self, request: &PublishRequest) -> Result<PublishReport, PublishError> {
        let new_name = file_name(&request.identity, request.source.extension());
        let mut transaction = Transaction::start(&new_name);
        let plan = self
            .plan(request, &new_name)
            .map_err(|source| transaction.fail(source))?;

        self.files
            .copy_file(&request.source.path(), &plan.destination)
            .map_err(|source| transaction.fail(source.into()))?;
        transaction.advance(PublishStage::Copied);

        self.files
            .remove_file(&request.source.path())
            .map_err(|source| transaction.fail(source.into()))?;
        transaction.advance(PublishStage::Promoted);

        let mut archived = Vec::with_capacity(plan.moves.len());
        for archive_move in &plan.moves {
            self.files
                .move_file(&archive_move.from, &archive_move.to)
                .map_err(|source| transaction.fail(source.into()))?;
            archived.push(archive_move.to.clone());
        }
        transaction.advance(PublishStage::Archived);

        let mut snapshots = Vec::with_capacity(plan.scopes.len());
        let mut warnings = Vec::new();
        for scope in &plan.scopes {
            match self.registry.create_snapshot(scope) {
                Ok(outcome) => snapshots.push(outcome),
                Err(error) => {
                    warn!(scope = %scope, error = %error, "registry snapshot failed after publish");
                    warnings.push(format!("registry {scope} not updated: {error}"));
                }
            }
        }
        if warnings.is_empty() {
            transaction.advance(PublishStage::SnapshotTaken);
        }

        Ok(PublishReport {
            stage: transaction.stage,
            published: plan.destination,
            archived,
            snapshots,
            warnings,
        })
    }

    fn plan(&self, request: &PublishRequest, new_name: &str) -> Result<PublishPlan, StoreError> {
        request.identity.validate(self.config.year_bounds())?;
        let category = self.target_category(request.category.as_deref())?;

        let source = request.source.path();
        if !self.files.file_exists(&source) {
            return Err(StoreError::not_found(source.as_str()));
        }

        let active_dir = self.config.zone_dir(Zone::Active, category);
        self.require_dir(&active_dir)?;
        let destination = active_dir.join(new_name);
        if self.files.file_exists(&destination) {
            return Err(StoreError::version_conflict(destination.as_str()));
        }

        let mut scopes = vec![SnapshotScope::All];
        push_category_scope(&mut scopes, category);
        let mut taken = HashSet::new();
        let mut moves = Vec::with_capacity(request.archive.len());
        for doc in &request.archive {
            let from = doc.path();
            if !self.files.file_exists(&from) {
                return Err(StoreError::not_found(from.as_str()));
            }
            let own_category = doc.category().and_then(|name| self.config.category(name));
            let archive_category = own_category.or(category);
            let archive_dir = self.config.zone_dir(Zone::Archive, archive_category);
            self.require_dir(&archive_dir)?;
            let to = archive_dir.join(doc.file_name());
            if !taken.insert(to.clone()) || self.files.file_exists(&to) {
                return Err(StoreError::version_conflict(to.as_str()));
            }
            push_category_scope(&mut scopes, own_category);
            moves.push(ArchiveMove { from, to });
        }

        Ok(PublishPlan {
            destination,
            moves,
            scopes,
        })
    }

    fn target_category(&self, requested: Option<&str>) -> Result<Option<&Category>, StoreError> {
        match (requested, self.config.is_partitioned()) {
            (None, false) => Ok(None),
            (None, true) => Err(StoreError::not_found(
                "category (required in a partitioned store)",
            )),
            (Some(name), _) => self
                .config
                .category(name)
                .map(Some)
                .ok_or_else(|| StoreError::not_found(format!("category '{name}'"))),
        }
    }

    fn require_dir(&self, dir: &Utf8Path) -> Result<(), StoreError> {
        if self.files.dir_exists(dir) {
            Ok(())
        } else {
            Err(StoreError::not_found(format!("directory {dir}")))
        }
    }
}

fn push_category_scope(scopes: &mut Vec<SnapshotScope>, category: Option<&Category>) {
    if let Some(found) = category {
        let scope = SnapshotScope::Category(found.name().to_owned());
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }
}
