//! Filename decoding and encoding.
//!
//! The metadata token is read right to left: the last dash segment is the
//! year, the one before it the version, and everything earlier is
//! `type.code`. Codes may therefore contain dashes of their own.

use serde::{Deserialize, Serialize};

use crate::identity::{DocumentIdentity, IdentityField};
use crate::year::YearBounds;

/// Result of decoding a filename.
///
/// Invalid names keep whatever fields could be derived; when nothing could be
/// derived the raw filename is kept as the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedName {
    /// Type segment, empty when not derivable.
    pub doc_type: String,
    /// Code segment, empty when not derivable.
    pub code: String,
    /// Version segment, empty when not derivable.
    pub version: String,
    /// Year segment, present only when it parsed inside the bounds.
    pub year: Option<u16>,
    /// Title, or the raw filename when the name has no metadata token.
    pub title: String,
    /// Whether every field was derived.
    pub is_valid: bool,
}

impl DecodedName {
    fn invalid(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            ..Self::default()
        }
    }

    /// Returns the identity when the name decoded completely.
    #[must_use]
    pub fn identity(&self) -> Option<DocumentIdentity> {
        if !self.is_valid {
            return None;
        }
        Some(DocumentIdentity {
            doc_type: self.doc_type.clone(),
            code: self.code.clone(),
            version: self.version.clone(),
            year: self.year?,
            title: self.title.clone(),
        })
    }

    /// Returns the textual value of a field, empty when not derived.
    #[must_use]
    pub fn field(&self, field: IdentityField) -> String {
        match field {
            IdentityField::Type => self.doc_type.clone(),
            IdentityField::Code => self.code.clone(),
            IdentityField::Version => self.version.clone(),
            IdentityField::Year => self.year.map(|year| year.to_string()).unwrap_or_default(),
            IdentityField::Title => self.title.clone(),
        }
    }
}

/// Splits a filename into stem and extension.
///
/// The extension keeps its leading dot. Leading dots never start an
/// extension, so `.docx` has no extension.
///
/// # Example
///
/// ```
/// use doc_name::split_extension;
///
/// assert_eq!(split_extension("A.1-01-2020 Title.docx"), ("A.1-01-2020 Title", ".docx"));
/// assert_eq!(split_extension(".docx"), (".docx", ""));
/// ```
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let leading = file_name.len() - file_name.trim_start_matches('.').len();
    let (_, rest) = file_name.split_at(leading);
    match rest.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(leading + dot),
        _ => (file_name, ""),
    }
}

/// Decodes a filename into its identity fields.
///
/// Never fails: malformed names come back with `is_valid = false`.
///
/// # Example
///
/// ```
/// use doc_name::{YearBounds, decode};
///
/// let decoded = decode("random_notes.docx", YearBounds::default());
/// assert!(!decoded.is_valid);
/// assert_eq!(decoded.title, "random_notes.docx");
/// ```
#[must_use]
pub fn decode(file_name: &str, bounds: YearBounds) -> DecodedName {
    let (stem, _) = split_extension(file_name);
    decode_parts(stem, file_name, bounds)
}

/// Decodes a name that carries no extension, such as the output of
/// [`encode`] or a registry line.
///
/// # Example
///
/// ```
/// use doc_name::{YearBounds, decode_stem};
///
/// let decoded = decode_stem("ПП.К2-8.3-01-2022 Управление", YearBounds::default());
/// assert_eq!(decoded.code, "К2-8.3");
/// ```
#[must_use]
pub fn decode_stem(stem: &str, bounds: YearBounds) -> DecodedName {
    decode_parts(stem, stem, bounds)
}

fn decode_parts(stem: &str, raw: &str, bounds: YearBounds) -> DecodedName {
    let Some((metadata, title)) = split_metadata(stem) else {
        return DecodedName::invalid(raw);
    };

    let segments: Vec<&str> = metadata.split('-').collect();
    let [head @ .., version, year_segment] = segments.as_slice() else {
        return DecodedName::invalid(title);
    };
    if head.is_empty() {
        return DecodedName::invalid(title);
    }
    let Some(year) = bounds.parse(year_segment) else {
        return DecodedName::invalid(title);
    };

    let type_code = head.join("-");
    let Some((doc_type, code)) = type_code.split_once('.') else {
        return DecodedName {
            doc_type: String::new(),
            code: type_code,
            version: (*version).to_owned(),
            year: Some(year),
            title: title.to_owned(),
            is_valid: false,
        };
    };
    DecodedName {
        doc_type: doc_type.to_owned(),
        code: code.to_owned(),
        version: (*version).to_owned(),
        year: Some(year),
        title: title.to_owned(),
        is_valid: true,
    }
}

/// Encodes an identity as `{type}.{code}-{version}-{year} {title}`.
#[must_use]
pub fn encode(identity: &DocumentIdentity) -> String {
    format!(
        "{}.{}-{}-{} {}",
        identity.doc_type, identity.code, identity.version, identity.year, identity.title
    )
}

/// Encodes an identity and appends `extension` (which keeps its dot).
///
/// # Example
///
/// ```
/// use doc_name::{DocumentIdentity, file_name};
///
/// let identity = DocumentIdentity {
///     doc_type: "A".to_owned(),
///     code: "1".to_owned(),
///     version: "02".to_owned(),
///     year: 2021,
///     title: "Title".to_owned(),
/// };
/// assert_eq!(file_name(&identity, ".docx"), "A.1-02-2021 Title.docx");
/// ```
#[must_use]
pub fn file_name(identity: &DocumentIdentity, extension: &str) -> String {
    format!("{}{extension}", encode(identity))
}

/// Splits a stem into metadata token and title at the first whitespace run.
fn split_metadata(stem: &str) -> Option<(&str, &str)> {
    let boundary = stem.find(char::is_whitespace)?;
    if boundary == 0 {
        return None;
    }
    let (metadata, rest) = stem.split_at(boundary);
    let trimmed = rest.trim_start();
    let title = if trimmed.is_empty() {
        // A whitespace-only tail still yields a one-character title when the
        // run is at least two characters long.
        let last = rest.chars().next_back()?;
        let (run, tail) = rest.split_at(rest.len() - last.len_utf8());
        if run.is_empty() {
            return None;
        }
        tail
    } else {
        trimmed
    };

    if title.contains('\n') {
        return None;
    }
    Some((metadata, title))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("A.1-01-2020 Title", Some(("A.1-01-2020", "Title")))]
    #[case("A.1-01-2020   Two  words", Some(("A.1-01-2020", "Two  words")))]
    #[case("A.1-01-2020\tTab", Some(("A.1-01-2020", "Tab")))]
    #[case("A.1-01-2020  ", Some(("A.1-01-2020", " ")))]
    #[case("A.1-01-2020 ", None)]
    #[case(" leading", None)]
    #[case("nospace", None)]
    #[case("A.1-01-2020 line\nbreak", None)]
    #[case("A.1-01-2020 carriage\rreturn", Some(("A.1-01-2020", "carriage\rreturn")))]
    fn splits_metadata_on_first_whitespace_run(
        #[case] stem: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        assert_eq!(split_metadata(stem), expected);
    }

    #[rstest]
    #[case("file.docx", ("file", ".docx"))]
    #[case("archive.tar.gz", ("archive.tar", ".gz"))]
    #[case("noext", ("noext", ""))]
    #[case("..docx", ("..docx", ""))]
    #[case("", ("", ""))]
    #[case("ПП.К2-8.3-01-2022 Название.PDF", ("ПП.К2-8.3-01-2022 Название", ".PDF"))]
    fn splits_extension_like_a_path_splitter(#[case] name: &str, #[case] expected: (&str, &str)) {
        assert_eq!(split_extension(name), expected);
    }

    #[test]
    fn identity_is_absent_for_invalid_names() {
        let decoded = decode("A-01-2020 Title.docx", YearBounds::default());
        assert!(decoded.identity().is_none());
    }

    #[test]
    fn field_renders_missing_year_as_empty() {
        let decoded = decode("notes.docx", YearBounds::default());
        assert_eq!(decoded.field(IdentityField::Year), "");
        assert_eq!(decoded.field(IdentityField::Title), "notes.docx");
    }
}
