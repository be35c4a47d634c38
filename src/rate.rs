//! Percentages that may have no denominator yet.

use std::fmt;

use serde::Serialize;

/// A ratio reported as a percentage, or `NoData` when nothing was counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rate {
    Percent(f64),
    NoData,
}

impl Rate {
    /// `numerator / denominator * 100`, or `NoData` for a zero denominator.
    pub fn from_counts(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Self::NoData;
        }
        Self::Percent(numerator as f64 / denominator as f64 * 100.0)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{:.2}%", p),
            Self::NoData => f.write_str("n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_is_no_data() {
        assert_eq!(Rate::from_counts(0, 0), Rate::NoData);
        assert_eq!(Rate::from_counts(5, 0).to_string(), "n/a");
    }

    #[test]
    fn test_percent() {
        assert_eq!(Rate::from_counts(1, 4), Rate::Percent(25.0));
        assert_eq!(Rate::from_counts(1, 3).to_string(), "33.33%");
    }

    #[test]
    fn test_serializes_no_data_as_null() {
        assert_eq!(serde_json::to_string(&Rate::NoData).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Rate::Percent(50.0)).unwrap(), "50.0");
    }
}
