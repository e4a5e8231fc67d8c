//! Parsing snapshot bodies back into numbered rows.
//!
//! Downstream exporters read bodies line by line: a trimmed line whose text
//! before the first `". "` is all ASCII digits is a document row. Every other
//! line is layout.

use serde::Serialize;
use tracing::warn;

/// One numbered row of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// Position in the snapshot, starting at 1.
    pub number: u32,
    /// Rendered document name.
    pub name: String,
}

/// Extracts the document rows of a snapshot body.
///
/// # Example
///
/// ```
/// use docstore::domain::registry::parse_entries;
///
/// let body = "Версия: 2\n\n1. РК.1-02-2021 Руководство\n2. notes.pdf\n\nИТОГО: 2 действующих документов";
/// let names: Vec<_> = parse_entries(body).into_iter().map(|entry| entry.name).collect();
/// assert_eq!(names, ["РК.1-02-2021 Руководство", "notes.pdf"]);
/// ```
#[must_use]
pub fn parse_entries(body: &str) -> Vec<RegistryEntry> {
    body.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<RegistryEntry> {
    let (prefix, name) = line.trim().split_once(". ")?;
    if prefix.is_empty() || !prefix.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let number = prefix
        .parse::<u32>()
        .inspect_err(|error| {
            warn!(line = %line, error = %error, "skipping registry row with oversized number");
        })
        .ok()?;
    Some(RegistryEntry {
        number,
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("12. ПП.К2-01-2022 Управление. Часть 2", Some((12, "ПП.К2-01-2022 Управление. Часть 2")))]
    #[case("   3. notes.pdf  ", Some((3, "notes.pdf")))]
    #[case("Дата создания: 09.03.2024 14:05:00", None)]
    #[case("ИТОГО: 2 действующих документов", None)]
    #[case("1.5. Пункт", None)]
    #[case(". Пусто", None)]
    #[case("99999999999. Слишком много", None)]
    fn classifies_lines(#[case] line: &str, #[case] expected: Option<(u32, &str)>) {
        let parsed = parse_line(line).map(|entry| (entry.number, entry.name));
        assert_eq!(parsed, expected.map(|(number, name)| (number, name.to_owned())));
    }
}
