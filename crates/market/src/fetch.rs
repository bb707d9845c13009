//! Scoped dataset queries
//!
//! Thin client over the daily mandi price resource. The upstream supports
//! field filters and a page cap but no date ranges, so date filtering is
//! always client-side, after fetch. Transport failures never propagate:
//! they become a typed `Failed` outcome that callers treat exactly like an
//! empty result while the cause stays visible in logs.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use krishi_agent_config::MarketDataConfig;

use crate::record::PriceRecord;
use crate::vocabulary::{CommodityVocabulary, VocabularyCache};

/// Server-side filters the upstream accepts
#[derive(Debug, Clone, Default)]
pub struct MarketFilters {
    pub state: Option<String>,
    pub commodity: Option<String>,
}

/// Outcome of a dataset fetch.
///
/// `Failed` and `Empty` read the same to pipelines ("no data available");
/// they are distinct so failures remain observable without changing
/// user-facing behavior.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Records(Vec<PriceRecord>),
    Empty,
    Failed(String),
}

impl FetchOutcome {
    /// The records, if any; `Empty` and `Failed` both yield nothing
    pub fn into_records(self) -> Vec<PriceRecord> {
        match self {
            Self::Records(records) => records,
            Self::Empty | Self::Failed(_) => Vec::new(),
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Records(r) if !r.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    #[serde(default)]
    records: Vec<PriceRecord>,
}

/// Keep records inside the optional `[date_from, date_to]` window.
///
/// Sentinel (unparsable) dates are excluded by any lower bound and pass any
/// upper bound - the documented consequence of sorting them oldest.
pub fn filter_by_date(
    records: Vec<PriceRecord>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Vec<PriceRecord> {
    records
        .into_iter()
        .filter(|r| {
            let arrival = r.arrival();
            if let Some(from) = date_from {
                if arrival < from {
                    return false;
                }
            }
            if let Some(to) = date_to {
                if arrival > to {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Client for the mandi price dataset, carrying the vocabulary cache
pub struct MarketDataClient {
    client: reqwest::Client,
    config: MarketDataConfig,
    vocabulary_cache: Arc<VocabularyCache>,
}

impl MarketDataClient {
    pub fn new(config: MarketDataConfig) -> Self {
        let cache = Arc::new(VocabularyCache::new(Duration::from_secs(
            config.vocabulary_ttl_secs,
        )));
        Self::with_cache(config, cache)
    }

    /// Inject a vocabulary cache (shared across clients, or a test fixture)
    pub fn with_cache(config: MarketDataConfig, vocabulary_cache: Arc<VocabularyCache>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            config,
            vocabulary_cache,
        }
    }

    pub fn config(&self) -> &MarketDataConfig {
        &self.config
    }

    pub fn vocabulary_cache(&self) -> &Arc<VocabularyCache> {
        &self.vocabulary_cache
    }

    /// Fetch records for the given filters, date-windowed client-side
    pub async fn fetch(
        &self,
        filters: &MarketFilters,
        limit: u32,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> FetchOutcome {
        let mut query: Vec<(String, String)> = vec![
            ("api-key".to_string(), self.config.api_key.clone()),
            ("format".to_string(), "json".to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        if let Some(state) = &filters.state {
            query.push(("filters[state]".to_string(), state.clone()));
        }
        if let Some(commodity) = &filters.commodity {
            query.push(("filters[commodity]".to_string(), commodity.clone()));
        }

        let url = format!("{}/{}", self.config.base_url, self.config.resource_id);
        let result = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Mandi dataset request failed");
                return FetchOutcome::Failed(e.to_string());
            }
        };

        let body: DatasetResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "Mandi dataset returned undecodable body");
                return FetchOutcome::Failed(e.to_string());
            }
        };

        let records = filter_by_date(body.records, date_from, date_to);
        tracing::debug!(
            state = filters.state.as_deref().unwrap_or("-"),
            commodity = filters.commodity.as_deref().unwrap_or("-"),
            count = records.len(),
            "Fetched mandi records"
        );

        if records.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Records(records)
        }
    }

    /// The live commodity vocabulary, from cache or refetched once per TTL.
    ///
    /// Returns `None` only when nothing is cached and the refresh fetch
    /// fails - the caller then proceeds with the commodity unresolved.
    pub async fn vocabulary(&self) -> Option<Arc<CommodityVocabulary>> {
        if let Some(cached) = self.vocabulary_cache.get(&self.config.api_key) {
            return Some(cached);
        }

        let outcome = self
            .fetch(&MarketFilters::default(), self.config.page_limit, None, None)
            .await;
        let records = match outcome {
            FetchOutcome::Records(r) => r,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => {
                tracing::warn!("Commodity vocabulary refresh failed");
                return None;
            }
        };

        let vocabulary =
            CommodityVocabulary::from_names(records.into_iter().map(|r| r.commodity));
        Some(self.vocabulary_cache.put(&self.config.api_key, vocabulary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str) -> PriceRecord {
        PriceRecord {
            arrival_date: date.into(),
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_window_filters_client_side() {
        let records = vec![
            dated("01/08/2026"),
            dated("20/07/2026"),
            dated("01/01/2026"),
        ];
        let kept = filter_by_date(records, Some(day(2026, 7, 15)), Some(day(2026, 8, 7)));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_sentinel_dates_excluded_by_lower_bound() {
        let records = vec![dated("garbage"), dated("01/08/2026")];
        let kept = filter_by_date(records, Some(day(2026, 1, 1)), None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].arrival_date, "01/08/2026");
    }

    #[test]
    fn test_sentinel_dates_eligible_without_lower_bound() {
        let records = vec![dated("garbage"), dated("01/08/2026")];
        // an upper bound alone does not exclude the sentinel
        let kept = filter_by_date(records, None, Some(day(2026, 12, 31)));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_open_window_keeps_everything() {
        let records = vec![dated("garbage"), dated("01/08/2026"), dated("")];
        assert_eq!(filter_by_date(records, None, None).len(), 3);
    }

    #[test]
    fn test_dataset_response_decode() {
        let raw = r#"{"records":[{"state":"Punjab","district":"Ludhiana",
            "market":"Khanna","commodity":"Wheat","arrival_date":"05/08/2026",
            "min_price":"2300","max_price":"2500","modal_price":"2450"}]}"#;
        let body: DatasetResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.records.len(), 1);
        assert_eq!(body.records[0].modal_price().unwrap(), 2450.0);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_failed_not_error() {
        let config = MarketDataConfig {
            api_key: "test".into(),
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 1,
            ..Default::default()
        };
        let client = MarketDataClient::new(config);
        let outcome = client
            .fetch(&MarketFilters::default(), 10, None, None)
            .await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(outcome.into_records().is_empty());
    }
}
