//! Text and JSON rendering of command results.

use std::io::Write;

use serde::Serialize;

use super::CliError;
use crate::domain::{Document, PublishReport, SnapshotOutcome};
use crate::store::SimilarDocument;

pub(super) fn json(out: &mut impl Write, value: &impl Serialize) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub(super) fn documents(out: &mut impl Write, documents: &[Document]) -> Result<(), CliError> {
    for doc in documents {
        if let Some(category) = doc.category() {
            write!(out, "[{category}] ")?;
        }
        if doc.is_valid() {
            writeln!(out, "{}", doc.file_name())?;
        } else {
            writeln!(out, "{}  (unrecognised name)", doc.file_name())?;
        }
    }
    writeln!(out, "{} document(s)", documents.len())?;
    Ok(())
}

pub(super) fn similar(
    out: &mut impl Write,
    draft: &str,
    similar: &[SimilarDocument],
) -> Result<(), CliError> {
    if similar.is_empty() {
        writeln!(out, "no active documents resemble {draft}")?;
        return Ok(());
    }
    for item in similar {
        writeln!(out, "{}", item.document.file_name())?;
        let matches: Vec<_> = item.comparison.matches.iter().map(ToString::to_string).collect();
        let differences: Vec<_> = item
            .comparison
            .differences
            .iter()
            .map(ToString::to_string)
            .collect();
        if !matches.is_empty() {
            writeln!(out, "  same: {}", matches.join(", "))?;
        }
        if !differences.is_empty() {
            writeln!(out, "  differs: {}", differences.join(", "))?;
        }
    }
    Ok(())
}

pub(super) fn publish_report(out: &mut impl Write, report: &PublishReport) -> Result<(), CliError> {
    writeln!(out, "published {}", report.published)?;
    for path in &report.archived {
        writeln!(out, "archived {path}")?;
    }
    snapshots(out, &report.snapshots)?;
    for warning in &report.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    writeln!(out, "stage: {}", report.stage)?;
    Ok(())
}

pub(super) fn snapshots(out: &mut impl Write, outcomes: &[SnapshotOutcome]) -> Result<(), CliError> {
    for outcome in outcomes {
        writeln!(
            out,
            "registry {} version {} written to {} ({} documents)",
            outcome.scope, outcome.version, outcome.file_name, outcome.entries
        )?;
        for pruned in &outcome.pruned {
            writeln!(out, "  pruned {pruned}")?;
        }
    }
    Ok(())
}
