//! Error types for identity validation.

use thiserror::Error;

use crate::identity::IdentityField;

/// Reasons an identity cannot be encoded into a filename that decodes back to
/// the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// A required field is empty once trimmed.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Field that was empty.
        field: IdentityField,
    },

    /// A field contains a character the filename grammar reserves.
    #[error("{field} must not contain {character:?}")]
    ForbiddenCharacter {
        /// Field holding the character.
        field: IdentityField,
        /// The offending character.
        character: char,
    },

    /// The title starts or ends with whitespace, which the grammar would trim.
    #[error("title must not start or end with whitespace")]
    UntrimmedTitle,

    /// The year lies outside the configured bounds.
    #[error("year {year} is outside {min}..={max}")]
    YearOutOfBounds {
        /// Year supplied.
        year: u16,
        /// Lowest accepted year.
        min: u16,
        /// Highest accepted year.
        max: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_formats_with_label() {
        let err = IdentityError::EmptyField {
            field: IdentityField::Code,
        };
        assert_eq!(err.to_string(), "КОД must not be empty");
    }

    #[test]
    fn forbidden_character_formats_correctly() {
        let err = IdentityError::ForbiddenCharacter {
            field: IdentityField::Version,
            character: '-',
        };
        assert_eq!(err.to_string(), "ВЕРСИЯ must not contain '-'");
    }

    #[test]
    fn year_out_of_bounds_formats_correctly() {
        let err = IdentityError::YearOutOfBounds {
            year: 1999,
            min: 2000,
            max: 2050,
        };
        assert_eq!(err.to_string(), "year 1999 is outside 2000..=2050");
    }
}
