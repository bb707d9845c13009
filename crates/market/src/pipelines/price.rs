//! get_price aggregation
//!
//! The headline quote is the median - not the mean - of the three most
//! recent-and-complete reports in scope, so one outlier market cannot drag
//! the figure.

use chrono::NaiveDate;

use krishi_agent_core::Confidence;

use crate::record::{NormalizedPrice, PriceRecord};

/// Aggregated price quote for a scope
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub median_per_quintal: f64,
    /// How many reports backed the median (at most 3)
    pub records_used: usize,
    pub latest_date: NaiveDate,
    pub confidence: Confidence,
}

/// Median of a set of prices; even-sized sets average the middle pair
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Compute the scope's price quote from raw records.
///
/// Selection key is recency first, completeness second; only records that
/// normalize to a usable price are candidates. Confidence combines the
/// freshest selected record's age with whether any selected record's figure
/// came from a modal price.
pub fn compute_price_quote(records: &[PriceRecord], today: NaiveDate) -> Option<PriceQuote> {
    let mut candidates: Vec<(&PriceRecord, NormalizedPrice)> = records
        .iter()
        .filter_map(|r| NormalizedPrice::from_record(r).map(|n| (r, n)))
        .collect();

    candidates.sort_by(|(a, _), (b, _)| {
        b.arrival()
            .cmp(&a.arrival())
            .then(b.completeness().cmp(&a.completeness()))
    });
    candidates.truncate(3);

    if candidates.is_empty() {
        return None;
    }

    let prices: Vec<f64> = candidates.iter().map(|(_, n)| n.price_per_quintal).collect();
    let median_per_quintal = median(&prices)?;

    let latest_date = candidates[0].0.arrival();
    let days_old = candidates[0].0.age_days(today);
    let any_modal = candidates.iter().any(|(_, n)| n.used_modal);

    Some(PriceQuote {
        median_per_quintal,
        records_used: candidates.len(),
        latest_date,
        confidence: Confidence::classify(days_old, any_modal),
    })
}
