//! Deterministic intent classification
//!
//! A fast keyword/pattern stage runs on every query; only queries the
//! patterns cannot place fall through to the LLM extractor's intent hint.
//! More specific intents are checked first so "is soybean trending up"
//! never lands on the plain price lookup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Current price for a commodity in a scope
    GetPrice,
    /// Highest-paying markets to sell at
    BestSell,
    /// Cheapest markets to buy from
    BestBuy,
    /// Price movement over the recent window
    Trend,
    /// Explicit market comparison (sell/buy keyword decides direction)
    ComparePrices,
    /// "A trader offered me X - good deal?"
    OfferEvaluation,
    /// Weather forecast
    Weather,
    /// Everything else goes to the document knowledge base
    Knowledge,
}

impl QueryIntent {
    /// Parse an intent name as the LLM fallback reports it
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "get_price" | "price" => Some(Self::GetPrice),
            "best_sell" | "best_sell_location" => Some(Self::BestSell),
            "best_buy" => Some(Self::BestBuy),
            "trend" => Some(Self::Trend),
            "compare_prices" | "compare" => Some(Self::ComparePrices),
            "is_offer_good" | "offer" => Some(Self::OfferEvaluation),
            "weather" => Some(Self::Weather),
            _ => None,
        }
    }

    /// True for every intent served by the market pipelines
    pub fn is_market(&self) -> bool {
        matches!(
            self,
            Self::GetPrice
                | Self::BestSell
                | Self::BestBuy
                | Self::Trend
                | Self::ComparePrices
                | Self::OfferEvaluation
        )
    }
}

static OFFER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(offer(?:ed|ing|s)?|good (?:price|deal|rate)|fair price)\b").unwrap()
});

static BEST_MARKET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(best|top|where|which)\b.{0,40}\b(sell|buy|mandi|mandis|market|markets)\b")
        .unwrap()
});

static TREND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(trend(?:ing)?|going (?:up|down)|rising|falling|increas\w*|decreas\w*|up or down)\b")
        .unwrap()
});

static COMPARE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(compare|comparison|versus|vs\.?)\b").unwrap());

static WEATHER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(weather|rain(?:fall|ing)?|temperature|humidity|forecast|wind|frost|heatwave|mausam|barish)\b",
    )
    .unwrap()
});

static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(price|prices|rate|rates|bhav|mandi|modal)\b").unwrap()
});

static BUY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(buy|purchase|procure)\b").unwrap());

static SELL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsell\b").unwrap());

/// Classify a query (already in English) by keyword patterns
pub fn classify(text: &str) -> QueryIntent {
    if OFFER_PATTERN.is_match(text) {
        return QueryIntent::OfferEvaluation;
    }

    if BEST_MARKET_PATTERN.is_match(text) {
        if BUY_PATTERN.is_match(text) && !SELL_PATTERN.is_match(text) {
            return QueryIntent::BestBuy;
        }
        return QueryIntent::BestSell;
    }

    if TREND_PATTERN.is_match(text) && PRICE_PATTERN.is_match(text) {
        return QueryIntent::Trend;
    }

    if COMPARE_PATTERN.is_match(text) && PRICE_PATTERN.is_match(text) {
        return QueryIntent::ComparePrices;
    }

    if WEATHER_PATTERN.is_match(text) {
        return QueryIntent::Weather;
    }

    if PRICE_PATTERN.is_match(text) {
        return QueryIntent::GetPrice;
    }

    QueryIntent::Knowledge
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_price_queries() {
        assert_eq!(classify("what is the price of rice in punjab"), QueryIntent::GetPrice);
        assert_eq!(classify("wheat ka bhav in 302031"), QueryIntent::GetPrice);
        assert_eq!(classify("modal rate of cotton in Warangal"), QueryIntent::GetPrice);
    }

    #[test]
    fn test_best_market_queries() {
        assert_eq!(
            classify("top 3 mandis to sell onion in Nashik"),
            QueryIntent::BestSell
        );
        assert_eq!(
            classify("best place to sell basmati from Karnal"),
            QueryIntent::BestSell
        );
        assert_eq!(
            classify("where can I buy cheap seed potato"),
            QueryIntent::BestBuy
        );
    }

    #[test]
    fn test_trend_beats_price() {
        assert_eq!(
            classify("is soybean price in Indore trending up or down"),
            QueryIntent::Trend
        );
    }

    #[test]
    fn test_offer_queries() {
        assert_eq!(
            classify("a trader offered ₹25 per kg for my wheat, is that good"),
            QueryIntent::OfferEvaluation
        );
        assert_eq!(
            classify("is 2400 a good price for wheat"),
            QueryIntent::OfferEvaluation
        );
    }

    #[test]
    fn test_compare_queries() {
        assert_eq!(
            classify("compare onion prices in Nashik and Pune"),
            QueryIntent::ComparePrices
        );
    }

    #[test]
    fn test_weather_queries() {
        assert_eq!(classify("will it rain tomorrow in 751001"), QueryIntent::Weather);
        assert_eq!(classify("humidity tomorrow in Coimbatore"), QueryIntent::Weather);
        assert_eq!(classify("chance of frost this weekend in Hisar"), QueryIntent::Weather);
    }

    #[test]
    fn test_everything_else_is_knowledge() {
        assert_eq!(
            classify("how much does it cost to grow wheat"),
            QueryIntent::Knowledge
        );
        assert_eq!(
            classify("when should I spray imazethapyr for soybean"),
            QueryIntent::Knowledge
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(QueryIntent::from_name("get_price"), Some(QueryIntent::GetPrice));
        assert_eq!(QueryIntent::from_name("WEATHER"), Some(QueryIntent::Weather));
        assert_eq!(QueryIntent::from_name("other"), None);
    }
}
