//! Accepted range for the year segment of a document name.

use serde::{Deserialize, Serialize};

/// Lowest year accepted by default.
pub const DEFAULT_YEAR_MIN: u16 = 2000;
/// Highest year accepted by default.
pub const DEFAULT_YEAR_MAX: u16 = 2050;

/// Inclusive bounds for the trailing year segment.
///
/// # Example
///
/// ```
/// use doc_name::YearBounds;
///
/// let bounds = YearBounds::new(2000, 2050).expect("ordered bounds");
/// assert!(bounds.contains(2022));
/// assert!(!bounds.contains(1999));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    min: u16,
    max: u16,
}

impl YearBounds {
    /// Builds bounds, returning `None` when `min > max`.
    #[must_use]
    pub const fn new(min: u16, max: u16) -> Option<Self> {
        if min > max {
            return None;
        }
        Some(Self { min, max })
    }

    /// Lowest accepted year.
    #[must_use]
    pub const fn min(self) -> u16 {
        self.min
    }

    /// Highest accepted year.
    #[must_use]
    pub const fn max(self) -> u16 {
        self.max
    }

    /// Returns whether `year` lies inside the bounds.
    #[must_use]
    pub const fn contains(self, year: u16) -> bool {
        self.min <= year && year <= self.max
    }

    /// Parses a year segment and checks it against the bounds.
    ///
    /// Values that are not integers, or integers outside the bounds, yield
    /// `None`.
    #[must_use]
    pub fn parse(self, segment: &str) -> Option<u16> {
        let value = segment.parse::<i64>().ok()?;
        let year = u16::try_from(value).ok()?;
        self.contains(year).then_some(year)
    }
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_YEAR_MIN,
            max: DEFAULT_YEAR_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("2000", Some(2000))]
    #[case("2050", Some(2050))]
    #[case("2022", Some(2022))]
    #[case("1999", None)]
    #[case("2051", None)]
    #[case("70000", None)]
    #[case("20x2", None)]
    #[case("", None)]
    fn parses_against_default_bounds(#[case] segment: &str, #[case] expected: Option<u16>) {
        assert_eq!(YearBounds::default().parse(segment), expected);
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(YearBounds::new(2050, 2000).is_none());
    }
}
