//! Upstream price records
//!
//! One record is one market's reported prices for one commodity on one day.
//! Every field arrives as a string and any of them may be missing or "N/A";
//! parsing is lenient throughout. Records never fail to construct - bad
//! fields degrade to absent values with documented sorting consequences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel for unparsable arrival dates: sorts before every real date, so
/// such records rank last in most-recent-first orderings and are excluded by
/// any lower date bound.
pub const SENTINEL_DATE: NaiveDate = NaiveDate::MIN;

/// One upstream observation from the mandi price dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub commodity: String,
    /// Day/month/year as reported ("07/08/2026")
    #[serde(default)]
    pub arrival_date: String,
    #[serde(default)]
    pub min_price: String,
    #[serde(default)]
    pub max_price: String,
    #[serde(default)]
    pub modal_price: String,
}

/// Parse an upstream price field; "N/A", blanks and junk are absent, not
/// errors. Zero is treated as missing - the dataset uses it as a filler.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("n/a") || cleaned.eq_ignore_ascii_case("na")
    {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}

impl PriceRecord {
    pub fn min_price(&self) -> Option<f64> {
        parse_price(&self.min_price)
    }

    pub fn max_price(&self) -> Option<f64> {
        parse_price(&self.max_price)
    }

    pub fn modal_price(&self) -> Option<f64> {
        parse_price(&self.modal_price)
    }

    /// Arrival date, or [`SENTINEL_DATE`] when it does not parse
    pub fn arrival(&self) -> NaiveDate {
        let raw = self.arrival_date.trim();
        NaiveDate::parse_from_str(raw, "%d/%m/%Y")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%d-%m-%Y"))
            .unwrap_or(SENTINEL_DATE)
    }

    /// Whole days between arrival and `today`; sentinel dates read as
    /// arbitrarily old
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.arrival()).num_days()
    }

    /// How many of the three price fields carry a usable number
    pub fn completeness(&self) -> u8 {
        [self.min_price(), self.max_price(), self.modal_price()]
            .iter()
            .filter(|p| p.is_some())
            .count() as u8
    }

    /// Identity of the reporting market, for latest-per-market collapsing
    pub fn market_key(&self) -> String {
        format!("{}|{}|{}", self.state, self.district, self.market)
    }
}

/// Clean per-quintal price derived from one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPrice {
    pub price_per_quintal: f64,
    /// True only when the modal price itself backed the figure; feeds
    /// confidence scoring
    pub used_modal: bool,
}

impl NormalizedPrice {
    /// Select the best available price for a record, in priority order:
    /// modal price; min/max average; whichever single bound is present;
    /// nothing.
    pub fn from_record(record: &PriceRecord) -> Option<Self> {
        if let Some(modal) = record.modal_price() {
            return Some(Self {
                price_per_quintal: modal,
                used_modal: true,
            });
        }

        match (record.min_price(), record.max_price()) {
            (Some(min), Some(max)) => Some(Self {
                price_per_quintal: (min + max) / 2.0,
                used_modal: false,
            }),
            (Some(single), None) | (None, Some(single)) => Some(Self {
                price_per_quintal: single,
                used_modal: false,
            }),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(market: &str, date: &str, min: &str, max: &str, modal: &str) -> PriceRecord {
        PriceRecord {
            state: "Haryana".into(),
            district: "Karnal".into(),
            market: market.into(),
            commodity: "Wheat".into(),
            arrival_date: date.into(),
            min_price: min.into(),
            max_price: max.into(),
            modal_price: modal.into(),
        }
    }

    #[test]
    fn test_parse_price_lenient() {
        assert_eq!(parse_price("2450"), Some(2450.0));
        assert_eq!(parse_price(" 2,450.50 "), Some(2450.5));
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price("NA"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("0"), None);
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn test_arrival_date_formats() {
        assert_eq!(
            record("M", "07/08/2026", "", "", "").arrival(),
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
        );
        assert_eq!(
            record("M", "07-08-2026", "", "", "").arrival(),
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
        );
    }

    #[test]
    fn test_unparsable_date_is_sentinel_and_sorts_last() {
        let bad = record("M", "not-a-date", "", "", "");
        assert_eq!(bad.arrival(), SENTINEL_DATE);

        let good = record("M", "01/01/2020", "", "", "");
        let mut records = vec![bad.clone(), good.clone()];
        records.sort_by_key(|r| std::cmp::Reverse(r.arrival()));
        assert_eq!(records[0].arrival_date, good.arrival_date);
        assert_eq!(records[1].arrival_date, bad.arrival_date);
    }

    #[test]
    fn test_normalize_prefers_modal() {
        let r = record("M", "01/08/2026", "2000", "3000", "2400");
        let n = NormalizedPrice::from_record(&r).unwrap();
        assert_eq!(n.price_per_quintal, 2400.0);
        assert!(n.used_modal);
    }

    #[test]
    fn test_normalize_min_max_average() {
        let r = record("M", "01/08/2026", "2000", "3000", "N/A");
        let n = NormalizedPrice::from_record(&r).unwrap();
        assert_eq!(n.price_per_quintal, 2500.0);
        assert!(!n.used_modal);
    }

    #[test]
    fn test_normalize_single_bound() {
        let r = record("M", "01/08/2026", "2000", "", "");
        let n = NormalizedPrice::from_record(&r).unwrap();
        assert_eq!(n.price_per_quintal, 2000.0);
        assert!(!n.used_modal);

        let r = record("M", "01/08/2026", "", "3000", "");
        assert_eq!(
            NormalizedPrice::from_record(&r).unwrap().price_per_quintal,
            3000.0
        );
    }

    #[test]
    fn test_normalize_nothing_usable() {
        let r = record("M", "01/08/2026", "N/A", "", "0");
        assert!(NormalizedPrice::from_record(&r).is_none());
    }

    #[test]
    fn test_completeness_counts_fields() {
        assert_eq!(record("M", "", "1", "2", "3").completeness(), 3);
        assert_eq!(record("M", "", "1", "N/A", "3").completeness(), 2);
        assert_eq!(record("M", "", "", "", "").completeness(), 0);
    }
}
