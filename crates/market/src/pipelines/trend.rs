//! Price trend over the fetched window
//!
//! Deliberately a simple endpoint delta, not a fitted slope: the first and
//! last dated, priced observations are compared and the percentage change
//! reported with both dates.

use chrono::NaiveDate;

use crate::record::{NormalizedPrice, PriceRecord, SENTINEL_DATE};

/// Endpoint comparison over the scope's price history
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummary {
    pub first_date: NaiveDate,
    pub first_price_per_quintal: f64,
    pub last_date: NaiveDate,
    pub last_price_per_quintal: f64,
    pub pct_change: f64,
}

/// Compare the chronological endpoints of the usable price points.
///
/// Usable means a real (non-sentinel) date and a normalizable price; needs
/// observations on at least two distinct days.
pub fn compute_trend(records: &[PriceRecord]) -> Option<TrendSummary> {
    let mut points: Vec<(NaiveDate, f64)> = records
        .iter()
        .filter(|r| r.arrival() > SENTINEL_DATE)
        .filter_map(|r| NormalizedPrice::from_record(r).map(|n| (r.arrival(), n.price_per_quintal)))
        .collect();

    points.sort_by_key(|(date, _)| *date);

    let (first_date, first_price) = *points.first()?;
    let (last_date, last_price) = *points.last()?;
    if first_date == last_date {
        return None;
    }

    let pct_change = (last_price - first_price) / first_price * 100.0;

    Some(TrendSummary {
        first_date,
        first_price_per_quintal: first_price,
        last_date,
        last_price_per_quintal: last_price,
        pct_change,
    })
}
