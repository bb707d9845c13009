//! Confidence labelling for price answers
//!
//! Derived from how old the freshest supporting record is and whether the
//! modal price (rather than a min/max reconstruction) backed the answer.

use serde::{Deserialize, Serialize};

/// Confidence attached to a market-price answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Classify from record age (days) and modal-price usage.
    ///
    /// High needs fresh data (<= 7 days) backed by a modal price; Medium only
    /// needs data at most 14 days old; everything else is Low.
    pub fn classify(days_old: i64, used_modal: bool) -> Self {
        if days_old <= 7 && used_modal {
            Self::High
        } else if days_old <= 14 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// User-facing label; Low carries the staleness hint
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low (stale data)",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_modal_is_high() {
        assert_eq!(Confidence::classify(3, true), Confidence::High);
    }

    #[test]
    fn test_midrange_is_medium_regardless_of_modal() {
        assert_eq!(Confidence::classify(10, false), Confidence::Medium);
        assert_eq!(Confidence::classify(10, true), Confidence::Medium);
    }

    #[test]
    fn test_stale_is_low_even_with_modal() {
        assert_eq!(Confidence::classify(30, true), Confidence::Low);
        assert_eq!(Confidence::Low.label(), "Low (stale data)");
    }

    #[test]
    fn test_fresh_without_modal_is_medium() {
        assert_eq!(Confidence::classify(3, false), Confidence::Medium);
    }
}
