//! Mandi price pipeline
//!
//! The hard part of the assistant: turning an unstructured price question
//! into a confidence-annotated answer against a messy live dataset. Stages:
//!
//! - `vocabulary` - live commodity vocabulary with an explicit TTL cache
//! - `matcher`    - weighted-ratio fuzzy matching of user text to vocabulary
//! - `record`     - upstream price records, lenient parsing, sentinel dates
//! - `fetch`      - scoped dataset queries with client-side date filtering
//! - `normalize`  - per-quintal price selection and unit conversion
//! - `pipelines`  - per-intent aggregation/ranking and answer phrasing
//!
//! Data-quality rules live here, not in callers: "N/A" prices are absent,
//! unparsable dates sort oldest, upstream failures read as "no data".

pub mod fetch;
pub mod matcher;
pub mod normalize;
pub mod pipelines;
pub mod record;
pub mod vocabulary;

pub use fetch::{FetchOutcome, MarketDataClient, MarketFilters};
pub use matcher::{best_match, CommodityMatch};
pub use normalize::{format_inr, per_unit};
pub use record::{NormalizedPrice, PriceRecord, SENTINEL_DATE};
pub use pipelines::{MarketQuery, MarketService, TradeDirection};
pub use vocabulary::{CommodityVocabulary, VocabularyCache};
