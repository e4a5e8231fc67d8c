//! `docstore` command-line interface.
//!
//! Parsing is handled by `clap`; [`run`] executes one command against a
//! store and writes human-readable text, or JSON where requested, to the
//! supplied writer.

mod output;

use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use doc_name::DocumentIdentity;
use thiserror::Error;

use crate::domain::ports::{DocumentFiles, SnapshotSequence, SnapshotStore};
use crate::domain::{PublishError, SnapshotScope, StoreError, Zone};
use crate::store::DocumentStore;

/// Top-level arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "docstore",
    about = "Manage quality-management documents and their registries",
    version
)]
pub struct Cli {
    /// Documents root; overrides `DOCSTORE_DOCS_DIR`.
    #[arg(long, global = true, value_name = "dir")]
    pub root: Option<Utf8PathBuf>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Store operations exposed on the command line.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create every missing zone and category directory.
    Init,
    /// List the documents of a zone.
    List(ListArgs),
    /// Show active documents resembling a draft.
    Similar {
        /// Draft filename.
        draft: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Publish a draft, archiving what it supersedes.
    Publish(PublishArgs),
    /// Issue a new registry snapshot.
    Refresh {
        /// Refresh one category instead of the whole store.
        #[arg(long, value_name = "name", conflicts_with = "all")]
        category: Option<String>,
        /// Refresh the whole store and every category.
        #[arg(long)]
        all: bool,
    },
    /// Print the latest registry snapshot.
    Registry {
        /// Category series to read.
        #[arg(long, value_name = "name")]
        category: Option<String>,
        /// Print the parsed rows as JSON.
        #[arg(long)]
        entries: bool,
    },
}

/// Zone selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ZoneArg {
    /// Drafts.
    Drafts,
    /// Active documents.
    Active,
    /// Archived documents.
    Archive,
}

impl From<ZoneArg> for Zone {
    fn from(value: ZoneArg) -> Self {
        match value {
            ZoneArg::Drafts => Self::Drafts,
            ZoneArg::Active => Self::Active,
            ZoneArg::Archive => Self::Archive,
        }
    }
}

/// Arguments of `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Zone to list.
    #[arg(value_enum)]
    pub zone: ZoneArg,
    /// Restrict to one category.
    #[arg(long, value_name = "name")]
    pub category: Option<String>,
    /// Keep only documents of this type, such as `ПП` or `ДИ`.
    #[arg(long = "type", value_name = "type")]
    pub doc_type: Option<String>,
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `publish`.
#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Draft filename inside the drafts zone.
    #[arg(long, value_name = "file")]
    pub draft: String,
    /// Document type.
    #[arg(long = "type", value_name = "type")]
    pub doc_type: String,
    /// Document code.
    #[arg(long)]
    pub code: String,
    /// Version string.
    #[arg(long)]
    pub version: String,
    /// Publication year.
    #[arg(long)]
    pub year: u16,
    /// Title.
    #[arg(long)]
    pub title: String,
    /// Target category; required in a partitioned store.
    #[arg(long, value_name = "name")]
    pub category: Option<String>,
    /// Active document to archive; repeatable.
    #[arg(long = "archive", value_name = "file")]
    pub archive: Vec<String>,
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PublishArgs {
    fn identity(&self) -> DocumentIdentity {
        DocumentIdentity {
            doc_type: self.doc_type.clone(),
            code: self.code.clone(),
            version: self.version.clone(),
            year: self.year,
            title: self.title.clone(),
        }
    }
}

/// Failures reported by [`run`].
#[derive(Debug, Error)]
pub enum CliError {
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A publish stopped part-way.
    #[error(transparent)]
    Publish(#[from] PublishError),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    /// Output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

fn scope_of(category: Option<String>) -> SnapshotScope {
    category.map_or(SnapshotScope::All, SnapshotScope::Category)
}

/// Executes `command` against `store`, writing results to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when the store operation fails or output cannot be
/// written.
pub fn run<F, S, Q>(
    store: &DocumentStore<F, S, Q>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    F: DocumentFiles,
    S: SnapshotStore,
    Q: SnapshotSequence,
{
    match command {
        Command::Init => {
            store.init()?;
            writeln!(out, "store ready under {}", store.config().zone_root(Zone::Drafts))?;
        }
        Command::List(args) => {
            let mut documents = store.scan_zone(args.zone.into(), args.category.as_deref())?;
            if let Some(doc_type) = args.doc_type.as_deref() {
                documents.retain(|doc| doc.name().doc_type == doc_type);
            }
            if args.json {
                output::json(out, &documents)?;
            } else {
                output::documents(out, &documents)?;
            }
        }
        Command::Similar { draft, json } => {
            let similar = store.similar(&draft)?;
            if json {
                output::json(out, &similar)?;
            } else {
                output::similar(out, &draft, &similar)?;
            }
        }
        Command::Publish(args) => {
            let report =
                store.publish_draft(&args.draft, args.identity(), args.category, &args.archive)?;
            if args.json {
                output::json(out, &report)?;
            } else {
                output::publish_report(out, &report)?;
            }
        }
        Command::Refresh { category, all } => {
            let outcomes = if all {
                store.refresh_all()?
            } else {
                vec![store.refresh(&scope_of(category))?]
            };
            output::snapshots(out, &outcomes)?;
        }
        Command::Registry { category, entries } => {
            let scope = scope_of(category);
            if entries {
                output::json(out, &store.current_entries(&scope)?)?;
            } else {
                match store.current_body(&scope)? {
                    Some(body) => writeln!(out, "{body}")?,
                    None => writeln!(out, "no registry snapshot for {scope} yet")?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
