//! Detection of documents that share identity fields.
//!
//! Used before publishing a draft to show the operator which active
//! documents it probably supersedes.

use std::fmt;

use doc_name::IdentityField;
use serde::Serialize;

use crate::domain::document::Document;

/// A field whose value is the same, non-empty, in both documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    /// Compared field.
    pub field: IdentityField,
    /// Shared value.
    pub value: String,
}

impl fmt::Display for FieldMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.field, self.value)
    }
}

/// A field populated in both documents with different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDifference {
    /// Compared field.
    pub field: IdentityField,
    /// Value in the first document.
    pub left: String,
    /// Value in the second document.
    pub right: String,
}

impl fmt::Display for FieldDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}≠{})", self.field, self.left, self.right)
    }
}

/// Field-by-field comparison of two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Fields equal in both documents, in filename order.
    pub matches: Vec<FieldMatch>,
    /// Fields that differ, in filename order.
    pub differences: Vec<FieldDifference>,
}

impl Comparison {
    /// Whether all five identity fields match.
    #[must_use]
    pub fn is_identical_identity(&self) -> bool {
        self.matches.len() == IdentityField::ALL.len()
    }
}

/// Returns the candidates that share a code or a title with `doc`.
///
/// Codes match exactly, titles ignoring case; empty values never match.
/// Candidates with the same filename as `doc` are skipped.
#[must_use]
pub fn find_similar<'a>(doc: &Document, candidates: &'a [Document]) -> Vec<&'a Document> {
    let code = &doc.name().code;
    let title = doc.name().title.to_lowercase();
    candidates
        .iter()
        .filter(|other| other.file_name() != doc.file_name())
        .filter(|other| {
            let code_match = !code.is_empty() && other.name().code == *code;
            let title_match = !title.is_empty() && other.name().title.to_lowercase() == title;
            code_match || title_match
        })
        .collect()
}

/// Compares two documents field by field.
///
/// Fields empty in either document appear in neither list. Titles are
/// compared exactly here, unlike in [`find_similar`].
#[must_use]
pub fn compare(first: &Document, second: &Document) -> Comparison {
    let mut comparison = Comparison::default();
    for field in IdentityField::ALL {
        let left = first.name().field(field);
        let right = second.name().field(field);
        if left.is_empty() || right.is_empty() {
            continue;
        }
        if left == right {
            comparison.matches.push(FieldMatch { field, value: left });
        } else {
            comparison
                .differences
                .push(FieldDifference { field, left, right });
        }
    }
    comparison
}
