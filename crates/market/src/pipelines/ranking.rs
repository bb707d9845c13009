//! Market ranking for best_sell / best_buy / compare_prices
//!
//! Records older than the window are dropped, each market collapses to its
//! single latest report, and markets rank by per-kg price - descending when
//! selling, ascending when buying - with recency as the tie-break.

use std::collections::HashMap;

use chrono::NaiveDate;

use krishi_agent_core::MassUnit;

use crate::normalize::per_unit;
use crate::record::{NormalizedPrice, PriceRecord, SENTINEL_DATE};

/// Whether the user wants the highest price (sell) or the lowest (buy)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Sell,
    Buy,
}

impl TradeDirection {
    /// Detect direction from the raw query; sell is the default when
    /// neither keyword appears.
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        let buy_pos = ["buy", "purchase", "procure"]
            .iter()
            .filter_map(|k| lower.find(k))
            .min();
        let sell_pos = lower.find("sell");
        match (sell_pos, buy_pos) {
            (Some(s), Some(b)) if b < s => Self::Buy,
            (None, Some(_)) => Self::Buy,
            _ => Self::Sell,
        }
    }
}

/// One market's best current quote
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuote {
    pub market: String,
    pub district: String,
    pub state: String,
    pub date: NaiveDate,
    pub price_per_quintal: f64,
    pub price_per_kg: f64,
    pub used_modal: bool,
}

/// Collapse to the single latest record per distinct market.
///
/// Same-day duplicates keep the more complete record.
pub fn latest_per_market(records: &[PriceRecord]) -> Vec<&PriceRecord> {
    let mut latest: HashMap<String, &PriceRecord> = HashMap::new();
    for record in records {
        latest
            .entry(record.market_key())
            .and_modify(|current| {
                let newer = record.arrival() > current.arrival()
                    || (record.arrival() == current.arrival()
                        && record.completeness() > current.completeness());
                if newer {
                    *current = record;
                }
            })
            .or_insert(record);
    }
    latest.into_values().collect()
}

/// Rank markets for a trade direction over a recency window.
///
/// A market only appears when its latest report is inside the window and
/// carries a usable price; sentinel-dated records can never pass the window
/// check.
pub fn rank_markets(
    records: &[PriceRecord],
    today: NaiveDate,
    direction: TradeDirection,
    window_days: i64,
) -> Vec<MarketQuote> {
    let fresh: Vec<PriceRecord> = records
        .iter()
        .filter(|r| r.arrival() > SENTINEL_DATE && r.age_days(today) <= window_days)
        .cloned()
        .collect();

    let mut quotes: Vec<MarketQuote> = latest_per_market(&fresh)
        .into_iter()
        .filter_map(|record| {
            NormalizedPrice::from_record(record).map(|n| MarketQuote {
                market: record.market.clone(),
                district: record.district.clone(),
                state: record.state.clone(),
                date: record.arrival(),
                price_per_quintal: n.price_per_quintal,
                price_per_kg: per_unit(n.price_per_quintal, MassUnit::Kilogram),
                used_modal: n.used_modal,
            })
        })
        .collect();

    quotes.sort_by(|a, b| {
        let by_price = match direction {
            TradeDirection::Sell => b
                .price_per_kg
                .partial_cmp(&a.price_per_kg)
                .unwrap_or(std::cmp::Ordering::Equal),
            TradeDirection::Buy => a
                .price_per_kg
                .partial_cmp(&b.price_per_kg)
                .unwrap_or(std::cmp::Ordering::Equal),
        };
        by_price.then(b.date.cmp(&a.date))
    });

    quotes
}
