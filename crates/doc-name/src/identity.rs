//! Typed document identity and its fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::year::YearBounds;

const PATH_CHARACTERS: [char; 3] = ['/', '\\', '\0'];

/// The five identity fields encoded in a document filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    /// Short category code such as `ПП`.
    Type,
    /// Free-form document code.
    Code,
    /// Opaque version string.
    Version,
    /// Publication year.
    Year,
    /// Free-text title.
    Title,
}

impl IdentityField {
    /// All fields in filename order.
    pub const ALL: [Self; 5] = [
        Self::Type,
        Self::Code,
        Self::Version,
        Self::Year,
        Self::Title,
    ];

    /// Operator-facing label used in comparison reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Type => "ТИП",
            Self::Code => "КОД",
            Self::Version => "ВЕРСИЯ",
            Self::Year => "ГОД",
            Self::Title => "НАЗВАНИЕ",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured identity of a quality-management document.
///
/// # Example
///
/// ```
/// use doc_name::{DocumentIdentity, YearBounds};
///
/// let identity = DocumentIdentity {
///     doc_type: "ПП".to_owned(),
///     code: "К2-8.3".to_owned(),
///     version: "01".to_owned(),
///     year: 2022,
///     title: "Управление документацией".to_owned(),
/// };
/// assert!(identity.validate(YearBounds::default()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentIdentity {
    /// Short category code, text before the first `.` of the metadata token.
    pub doc_type: String,
    /// Document code; may contain dots and dashes.
    pub code: String,
    /// Version string; never interpreted numerically.
    pub version: String,
    /// Publication year.
    pub year: u16,
    /// Title following the first whitespace run.
    pub title: String,
}

impl DocumentIdentity {
    /// Returns the textual value of a field.
    #[must_use]
    pub fn field(&self, field: IdentityField) -> String {
        match field {
            IdentityField::Type => self.doc_type.clone(),
            IdentityField::Code => self.code.clone(),
            IdentityField::Version => self.version.clone(),
            IdentityField::Year => self.year.to_string(),
            IdentityField::Title => self.title.clone(),
        }
    }

    /// Checks that the identity encodes to a filename that decodes back to
    /// the same identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] naming the first offending field.
    pub fn validate(&self, bounds: YearBounds) -> Result<(), IdentityError> {
        require_token(IdentityField::Type, &self.doc_type, &['.'])?;
        require_token(IdentityField::Code, &self.code, &[])?;
        require_token(IdentityField::Version, &self.version, &['-'])?;

        if !bounds.contains(self.year) {
            return Err(IdentityError::YearOutOfBounds {
                year: self.year,
                min: bounds.min(),
                max: bounds.max(),
            });
        }

        validate_title(&self.title)
    }
}

fn require_token(
    field: IdentityField,
    value: &str,
    reserved: &[char],
) -> Result<(), IdentityError> {
    if value.trim().is_empty() {
        return Err(IdentityError::EmptyField { field });
    }
    let forbidden = value
        .chars()
        .find(|ch| {
            ch.is_whitespace() || reserved.contains(ch) || PATH_CHARACTERS.contains(ch)
        });
    if let Some(character) = forbidden {
        return Err(IdentityError::ForbiddenCharacter { field, character });
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), IdentityError> {
    if title.trim().is_empty() {
        return Err(IdentityError::EmptyField {
            field: IdentityField::Title,
        });
    }
    if title.trim() != title {
        return Err(IdentityError::UntrimmedTitle);
    }
    let forbidden = title
        .chars()
        .find(|ch| matches!(*ch, '\n' | '\r') || PATH_CHARACTERS.contains(ch));
    if let Some(character) = forbidden {
        return Err(IdentityError::ForbiddenCharacter {
            field: IdentityField::Title,
            character,
        });
    }
    Ok(())
}
