//! Offer evaluation (is_offer_good)
//!
//! Parses the offered price out of the raw query, converts it to per-kg and
//! classifies it against the scope's median per-kg rate: at least 10% above
//! is good, at least 10% below is poor, anything between is fair.

use once_cell::sync::Lazy;
use regex::Regex;

use krishi_agent_core::MassUnit;

use crate::pipelines::price::median;
use crate::record::{NormalizedPrice, PriceRecord};

/// Offered price as mentioned in the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferedPrice {
    pub amount: f64,
    /// Unit the amount is quoted per; a bare number reads as per-kg
    pub unit: MassUnit,
}

impl OfferedPrice {
    /// Offered rate expressed per kilogram
    pub fn per_kg(&self) -> f64 {
        self.amount / self.unit.in_kilograms()
    }
}

/// Verdict on the offer against the market reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferVerdict {
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for OfferVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        write!(f, "{word}")
    }
}

static PRICED_OFFER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:₹|rs\.?|inr)\s*(\d+(?:\.\d+)?)(?:\s*(?:per|/|a)\s*(kilograms?|kilos?|kgs?|grams?|gms?|g|qtl|quintals?|q|tonnes?|tons?))?",
    )
    .unwrap()
});

static PER_UNIT_OFFER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*(?:per|/|a)\s*(kilograms?|kilos?|kgs?|grams?|gms?|g|qtl|quintals?|q|tonnes?|tons?)",
    )
    .unwrap()
});

static BARE_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap());

/// Pull the offered price out of the raw query.
///
/// Priority: a currency-prefixed amount (with optional unit), then a
/// "<number> per <unit>" form, then the first bare number treated as
/// already per-kg.
pub fn parse_offer(text: &str) -> Option<OfferedPrice> {
    if let Some(caps) = PRICED_OFFER_PATTERN.captures(text) {
        let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
        let unit = caps
            .get(2)
            .and_then(|m| MassUnit::from_word(m.as_str()))
            .unwrap_or(MassUnit::Kilogram);
        return Some(OfferedPrice { amount, unit });
    }

    if let Some(caps) = PER_UNIT_OFFER_PATTERN.captures(text) {
        let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
        let unit = MassUnit::from_word(caps.get(2)?.as_str())?;
        return Some(OfferedPrice { amount, unit });
    }

    let caps = BARE_NUMBER_PATTERN.captures(text)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(OfferedPrice {
        amount,
        unit: MassUnit::Kilogram,
    })
}

/// Classify an offer against the reference rate (both per-kg)
pub fn classify_offer(offer_per_kg: f64, reference_per_kg: f64) -> OfferVerdict {
    if reference_per_kg <= 0.0 {
        return OfferVerdict::Fair;
    }
    let diff = (offer_per_kg - reference_per_kg) / reference_per_kg;
    if diff >= 0.10 {
        OfferVerdict::Good
    } else if diff <= -0.10 {
        OfferVerdict::Poor
    } else {
        OfferVerdict::Fair
    }
}

/// Median per-kg rate across all fetched records in scope
pub fn median_per_kg(records: &[PriceRecord]) -> Option<f64> {
    let per_kg: Vec<f64> = records
        .iter()
        .filter_map(NormalizedPrice::from_record)
        .map(|n| n.price_per_quintal / MassUnit::Quintal.in_kilograms())
        .collect();
    median(&per_kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_prefixed() {
        let offer = parse_offer("a trader offers ₹26 per kg for my wheat").unwrap();
        assert_eq!(offer.amount, 26.0);
        assert_eq!(offer.unit, MassUnit::Kilogram);

        let offer = parse_offer("someone offers Rs. 2400 per quintal").unwrap();
        assert_eq!(offer.amount, 2400.0);
        assert_eq!(offer.unit, MassUnit::Quintal);
        assert!((offer.per_kg() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_per_unit_without_currency() {
        let offer = parse_offer("is 30/kg a good deal for onion").unwrap();
        assert_eq!(offer.amount, 30.0);
        assert_eq!(offer.unit, MassUnit::Kilogram);
    }

    #[test]
    fn test_bare_number_defaults_to_per_kg() {
        let offer = parse_offer("I was offered 22 for my tomato, good?").unwrap();
        assert_eq!(offer.amount, 22.0);
        assert_eq!(offer.unit, MassUnit::Kilogram);
        assert_eq!(offer.per_kg(), 22.0);
    }

    #[test]
    fn test_no_number_is_none() {
        assert!(parse_offer("is this offer any good").is_none());
    }

    #[test]
    fn test_classification_bands() {
        // reference 50: 56 (+12%) good, 44 (-12%) poor, 49 (-2%) fair
        assert_eq!(classify_offer(56.0, 50.0), OfferVerdict::Good);
        assert_eq!(classify_offer(44.0, 50.0), OfferVerdict::Poor);
        assert_eq!(classify_offer(49.0, 50.0), OfferVerdict::Fair);

        // the 10% boundaries belong to good/poor
        assert_eq!(classify_offer(55.0, 50.0), OfferVerdict::Good);
        assert_eq!(classify_offer(45.0, 50.0), OfferVerdict::Poor);
    }

    #[test]
    fn test_median_per_kg() {
        let record = |modal: &str| PriceRecord {
            arrival_date: "05/08/2026".into(),
            modal_price: modal.into(),
            ..Default::default()
        };
        let records = vec![record("4000"), record("5000"), record("9000")];
        assert_eq!(median_per_kg(&records), Some(50.0));
    }
}
