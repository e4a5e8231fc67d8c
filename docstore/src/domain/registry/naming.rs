//! Snapshot file names.
//!
//! Numbered files are `{series}_{NNN}_{YYYY-MM-DD}.txt` with at least three
//! digits; the mirror is `{series}_CURRENT.txt`.

use chrono::NaiveDate;

/// Prefix shared by every series.
pub const SERIES_PREFIX: &str = "REGISTRY";

const EXTENSION: &str = ".txt";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Series name for the whole store or a category token.
#[must_use]
pub fn series_name(token: Option<&str>) -> String {
    token.map_or_else(
        || SERIES_PREFIX.to_owned(),
        |found| format!("{SERIES_PREFIX}_{found}"),
    )
}

/// File name of snapshot `number` of `series`, dated `date`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use docstore::domain::registry::numbered_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
/// assert_eq!(numbered_file_name("REGISTRY", 7, date), "REGISTRY_007_2024-03-09.txt");
/// assert_eq!(numbered_file_name("REGISTRY_PP", 1234, date), "REGISTRY_PP_1234_2024-03-09.txt");
/// ```
#[must_use]
pub fn numbered_file_name(series: &str, number: u32, date: NaiveDate) -> String {
    format!("{series}_{number:03}_{}{EXTENSION}", date.format(DATE_FORMAT))
}

/// File name of the mirror of the latest snapshot of `series`.
#[must_use]
pub fn current_file_name(series: &str) -> String {
    format!("{series}_CURRENT{EXTENSION}")
}

/// Extracts the snapshot number when `file_name` is a numbered file of
/// exactly `series`.
///
/// Files of other series, the mirror, and names with malformed numbers or
/// dates yield `None`.
#[must_use]
pub fn parse_number(series: &str, file_name: &str) -> Option<u32> {
    let rest = file_name
        .strip_prefix(series)?
        .strip_prefix('_')?
        .strip_suffix(EXTENSION)?;
    let (digits, date) = rest.split_once('_')?;
    if digits.len() < 3 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if !is_iso_date(date) {
        return None;
    }
    digits.parse().ok()
}

fn is_iso_date(value: &str) -> bool {
    let shaped = value.len() == 10
        && value.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    shaped && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("REGISTRY", "REGISTRY_001_2024-01-31.txt", Some(1))]
    #[case("REGISTRY", "REGISTRY_1000_2024-01-31.txt", Some(1000))]
    #[case("REGISTRY", "REGISTRY_CURRENT.txt", None)]
    #[case("REGISTRY", "REGISTRY_01_2024-01-31.txt", None)]
    #[case("REGISTRY", "REGISTRY_001_2024-02-30.txt", None)]
    #[case("REGISTRY", "REGISTRY_001_2024-1-31.txt", None)]
    #[case("REGISTRY", "REGISTRY_PP_001_2024-01-31.txt", None)]
    #[case("REGISTRY", "REGISTRY_001_2024-01-31.txt.bak", None)]
    #[case("REGISTRY_PP", "REGISTRY_PP_042_2024-01-31.txt", Some(42))]
    #[case("REGISTRY_PP", "REGISTRY_PPX_042_2024-01-31.txt", None)]
    #[case("REGISTRY", "REGISTRY_99999999999_2024-01-31.txt", None)]
    fn parses_numbers_of_one_series_only(
        #[case] series: &str,
        #[case] file_name: &str,
        #[case] expected: Option<u32>,
    ) {
        assert_eq!(parse_number(series, file_name), expected);
    }

    #[test]
    fn series_names_carry_the_token() {
        assert_eq!(series_name(None), "REGISTRY");
        assert_eq!(series_name(Some("DI")), "REGISTRY_DI");
        assert_eq!(current_file_name("REGISTRY_DI"), "REGISTRY_DI_CURRENT.txt");
    }
}
