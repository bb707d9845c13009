//! Per-intent market pipelines
//!
//! Every pipeline is one linear pass: resolve what can be resolved, fetch,
//! aggregate, phrase. Terminal states are an answer string or an explicit
//! "no data" message - there is no error state visible to the user.

pub mod offer;
pub mod price;
pub mod ranking;
pub mod trend;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use krishi_agent_core::QuantitySpec;
use krishi_agent_geo::GeoScope;

use crate::fetch::{FetchOutcome, MarketDataClient, MarketFilters};
use crate::matcher::best_match;
use crate::normalize::{format_inr, per_unit};
use crate::record::PriceRecord;

pub use ranking::TradeDirection;

/// Ranking pipelines accept slightly looser commodity matches than the
/// headline price quote.
const RANKING_MATCH_THRESHOLD: u8 = 80;

/// Default recency window for market ranking and comparison
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// Everything the entity extractor resolved for a market question
#[derive(Debug, Clone)]
pub struct MarketQuery {
    pub scope: GeoScope,
    /// Raw commodity mention, if any
    pub commodity_text: Option<String>,
    /// Quantity mentioned in the query, if any
    pub quantity: Option<QuantitySpec>,
}

impl MarketQuery {
    pub fn new(scope: GeoScope) -> Self {
        Self {
            scope,
            commodity_text: None,
            quantity: None,
        }
    }
}

/// Common preamble result shared by all pipelines
struct Prepared {
    /// Display label: canonical commodity, else the raw mention, else a
    /// generic word
    label: String,
    records: Vec<PriceRecord>,
}

/// Market pipelines over one dataset client
pub struct MarketService {
    client: Arc<MarketDataClient>,
    match_threshold: u8,
}

impl MarketService {
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        let match_threshold = client.config().match_threshold;
        Self {
            client,
            match_threshold,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn no_data_message(&self, label: &str, scope: &GeoScope) -> String {
        format!(
            "Sorry, I could not find recent market data for {} in {}. \
             Prices may not have been reported yet - please try another \
             commodity or a nearby district.",
            label, scope
        )
    }

    /// Resolve the commodity against the live vocabulary, fetch scoped
    /// records and apply the district preference. Commodity resolution is
    /// best-effort: below-threshold matches leave the dataset filter unset
    /// and keep the raw mention as a display label.
    async fn prepare(&self, query: &MarketQuery, threshold: u8) -> Prepared {
        let commodity_text = query.commodity_text.as_deref().unwrap_or("");

        let matched = match self.client.vocabulary().await {
            Some(vocabulary) => best_match(commodity_text, &vocabulary, threshold),
            None => None,
        };

        let label = matched
            .as_ref()
            .map(|m| m.canonical_name.clone())
            .or_else(|| {
                let trimmed = commodity_text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| "produce".to_string());

        let filters = MarketFilters {
            state: query.scope.state.clone(),
            commodity: matched.map(|m| m.canonical_name),
        };

        let limit = self.client.config().page_limit;
        let outcome = self.client.fetch(&filters, limit, None, None).await;
        let records = match outcome {
            FetchOutcome::Records(r) => r,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => Vec::new(),
        };

        Prepared {
            label,
            records: prefer_district(records, query.scope.district.as_deref()),
        }
    }

    /// get_price: median of the three most recent-and-complete reports
    pub async fn price_answer(&self, query: &MarketQuery) -> String {
        let prepared = self.prepare(query, self.match_threshold).await;
        if prepared.records.is_empty() {
            return self.no_data_message(&prepared.label, &query.scope);
        }

        let today = Self::today();
        let quote = match price::compute_price_quote(&prepared.records, today) {
            Some(q) => q,
            None => return self.no_data_message(&prepared.label, &query.scope),
        };

        let mut answer = format!(
            "Latest {} price in {}: {}/quintal ({}/kg), the median of {} \
             recent market reports (most recent {}). Confidence: {}.",
            prepared.label,
            query.scope,
            format_inr(Some(quote.median_per_quintal)),
            format_inr(Some(per_unit(
                quote.median_per_quintal,
                krishi_agent_core::MassUnit::Kilogram
            ))),
            quote.records_used,
            quote.latest_date.format("%d %b %Y"),
            quote.confidence,
        );

        if let Some(quantity) = query.quantity {
            answer.push(' ');
            answer.push_str(&quote_for_quantity(
                quote.median_per_quintal,
                quantity,
                "worth around",
            ));
        }

        answer
    }

    /// best_sell / best_buy: rank markets over the 14-day window
    pub async fn best_markets_answer(
        &self,
        query: &MarketQuery,
        direction: TradeDirection,
    ) -> String {
        self.ranked_answer(query, direction, DEFAULT_WINDOW_DAYS).await
    }

    /// compare_prices: like best_sell/best_buy, but the direction comes from
    /// a sell/buy keyword in the raw query (default sell) and the recency
    /// window is caller-specified.
    pub async fn compare_answer(
        &self,
        query: &MarketQuery,
        raw_query: &str,
        window_days: i64,
    ) -> String {
        let direction = TradeDirection::from_text(raw_query);
        self.ranked_answer(query, direction, window_days).await
    }

    async fn ranked_answer(
        &self,
        query: &MarketQuery,
        direction: TradeDirection,
        window_days: i64,
    ) -> String {
        let prepared = self.prepare(query, RANKING_MATCH_THRESHOLD).await;
        if prepared.records.is_empty() {
            return self.no_data_message(&prepared.label, &query.scope);
        }

        let today = Self::today();
        let ranked = ranking::rank_markets(&prepared.records, today, direction, window_days);
        if ranked.is_empty() {
            return self.no_data_message(&prepared.label, &query.scope);
        }

        let verb = match direction {
            TradeDirection::Sell => "sell",
            TradeDirection::Buy => "buy",
        };

        let mut answer = format!(
            "Top markets to {} {} in {}:",
            verb, prepared.label, query.scope
        );
        for (index, quote) in ranked.iter().take(3).enumerate() {
            answer.push_str(&format!(
                "\n{}. {} ({}, {}) - ₹{:.2}/kg ({}/quintal, reported {})",
                index + 1,
                quote.market,
                quote.district,
                quote.state,
                quote.price_per_kg,
                format_inr(Some(quote.price_per_quintal)),
                quote.date.format("%d %b %Y"),
            ));
        }

        if let Some(quantity) = query.quantity {
            let top = &ranked[0];
            let total = top.price_per_quintal * quantity.in_quintals();
            let sentence = match direction {
                TradeDirection::Sell => format!(
                    "\nSelling {} at {} would fetch about {}.",
                    quantity,
                    top.market,
                    format_inr(Some(total)),
                ),
                TradeDirection::Buy => format!(
                    "\nBuying {} at {} would cost about {}.",
                    quantity,
                    top.market,
                    format_inr(Some(total)),
                ),
            };
            answer.push_str(&sentence);
        }

        answer
    }

    /// trend: percentage change between the chronological endpoints
    pub async fn trend_answer(&self, query: &MarketQuery) -> String {
        let prepared = self.prepare(query, self.match_threshold).await;
        if prepared.records.is_empty() {
            return self.no_data_message(&prepared.label, &query.scope);
        }

        let summary = match trend::compute_trend(&prepared.records) {
            Some(s) => s,
            None => {
                return format!(
                    "I found only a single day of {} prices for {}, which is \
                     not enough to read a trend.",
                    prepared.label, query.scope
                )
            }
        };

        let movement = if summary.pct_change > 0.5 {
            "trending up"
        } else if summary.pct_change < -0.5 {
            "trending down"
        } else {
            "roughly steady"
        };

        format!(
            "{} prices in {} are {}: {}/quintal on {} to {}/quintal on {}, \
             a change of {:+.1}%.",
            prepared.label,
            query.scope,
            movement,
            format_inr(Some(summary.first_price_per_quintal)),
            summary.first_date.format("%d %b %Y"),
            format_inr(Some(summary.last_price_per_quintal)),
            summary.last_date.format("%d %b %Y"),
            summary.pct_change,
        )
    }

    /// is_offer_good: classify an offered price against the scope's median
    pub async fn offer_answer(&self, query: &MarketQuery, raw_query: &str) -> String {
        let prepared = self.prepare(query, self.match_threshold).await;

        let offer_per_kg = match offer::parse_offer(raw_query) {
            Some(offer) => offer.per_kg(),
            None => {
                return "I could not find the offered price in your message. \
                        Please mention it like \"₹25 per kg\" or \"₹2400 per quintal\"."
                    .to_string()
            }
        };

        if prepared.records.is_empty() {
            return self.no_data_message(&prepared.label, &query.scope);
        }

        let reference = match offer::median_per_kg(&prepared.records) {
            Some(r) => r,
            None => return self.no_data_message(&prepared.label, &query.scope),
        };

        let verdict = offer::classify_offer(offer_per_kg, reference);
        let diff_pct = (offer_per_kg - reference) / reference * 100.0;

        let mut answer = format!(
            "An offer of ₹{:.2}/kg for {} looks {}: the median market rate \
             in {} is ₹{:.2}/kg ({:+.0}% against the market).",
            offer_per_kg,
            prepared.label,
            verdict,
            query.scope,
            reference,
            diff_pct,
        );

        // Offer evaluation is a seller-side question, so the alternative
        // shown is the strongest selling market in the window.
        let today = Self::today();
        let ranked = ranking::rank_markets(
            &prepared.records,
            today,
            TradeDirection::Sell,
            DEFAULT_WINDOW_DAYS,
        );
        if let Some(top) = ranked.first() {
            answer.push_str(&format!(
                " If you can travel, {} ({}) reported ₹{:.2}/kg on {}.",
                top.market,
                top.district,
                top.price_per_kg,
                top.date.format("%d %b %Y"),
            ));
        }

        answer
    }

    /// Most recent usable per-quintal price for a commodity, for the alert
    /// scan. `None` covers both "no data" and upstream failure.
    pub async fn latest_price(
        &self,
        commodity: &str,
        state: Option<&str>,
    ) -> Option<(f64, NaiveDate)> {
        let filters = MarketFilters {
            state: state.map(|s| s.to_string()),
            commodity: Some(commodity.to_string()),
        };
        let limit = self.client.config().page_limit;
        let records = self.client.fetch(&filters, limit, None, None).await.into_records();

        let today = Self::today();
        price::compute_price_quote(&records, today)
            .map(|q| (q.median_per_quintal, q.latest_date))
    }
}

/// Keep only the scope district's records when that leaves anything;
/// otherwise fall back to the whole state.
fn prefer_district(records: Vec<PriceRecord>, district: Option<&str>) -> Vec<PriceRecord> {
    let Some(district) = district else {
        return records;
    };
    let wanted = district.to_lowercase();
    let local: Vec<PriceRecord> = records
        .iter()
        .filter(|r| r.district.to_lowercase() == wanted)
        .cloned()
        .collect();
    if local.is_empty() {
        records
    } else {
        local
    }
}

/// Phrase a rupee figure for a parsed quantity. Amounts of one or less read
/// as a per-unit price; anything larger reads as a total.
fn quote_for_quantity(price_per_quintal: f64, quantity: QuantitySpec, verb: &str) -> String {
    if quantity.amount <= 1.0 {
        let per_one = per_unit(price_per_quintal, quantity.unit);
        format!(
            "That is {} per {}.",
            format_inr(Some(per_one)),
            quantity.unit
        )
    } else {
        let total = price_per_quintal * quantity.in_quintals();
        format!("Your {} is {} {}.", quantity, verb, format_inr(Some(total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(district: &str, market: &str) -> PriceRecord {
        PriceRecord {
            state: "Haryana".into(),
            district: district.into(),
            market: market.into(),
            commodity: "Wheat".into(),
            arrival_date: "01/08/2026".into(),
            modal_price: "2400".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prefer_district_keeps_local_when_present() {
        let records = vec![record("Karnal", "A"), record("Hisar", "B")];
        let kept = prefer_district(records, Some("karnal"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].market, "A");
    }

    #[test]
    fn test_prefer_district_falls_back_to_state() {
        let records = vec![record("Hisar", "B"), record("Ambala", "C")];
        let kept = prefer_district(records, Some("Karnal"));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_quote_for_quantity_per_unit_vs_total() {
        use krishi_agent_core::MassUnit;

        let per_unit_phrase = quote_for_quantity(
            2400.0,
            QuantitySpec::new(1.0, MassUnit::Kilogram),
            "worth around",
        );
        assert!(per_unit_phrase.contains("per kg"), "{per_unit_phrase}");
        assert!(per_unit_phrase.contains("₹24"), "{per_unit_phrase}");

        let total_phrase = quote_for_quantity(
            2400.0,
            QuantitySpec::new(200.0, MassUnit::Kilogram),
            "worth around",
        );
        assert!(total_phrase.contains("₹4800"), "{total_phrase}");
    }
}
