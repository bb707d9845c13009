//! Query entity extraction
//!
//! Two independent stages behind one call:
//! 1. a deterministic pass - compiled regexes plus known state and
//!    commodity word lists - that handles the overwhelming share of real
//!    queries and is exhaustively testable, and
//! 2. an LLM fallback that only runs when the deterministic pass leaves
//!    gaps, parsed best-effort and merged without overriding stage 1.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use krishi_agent_core::{LanguageModel, MassUnit, QuantitySpec};
use krishi_agent_llm::json::{extract_json, string_field};
use krishi_agent_llm::prompt::entity_extraction_prompt;

use crate::intent::QueryIntent;

/// Entities pulled out of a raw query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryEntities {
    /// Commodity mention, verbatim (canonicalization happens downstream
    /// against the live vocabulary)
    pub commodity: Option<String>,
    /// Location mention: pincode, place name or state
    pub location: Option<String>,
    /// Quantity with a normalized unit
    pub quantity: Option<QuantitySpec>,
    /// Intent as the LLM fallback saw it, when stage 1 asked for help
    pub intent_hint: Option<QueryIntent>,
}

impl QueryEntities {
    /// Fill gaps from another extraction without overriding present fields
    pub fn merge_missing(&mut self, other: QueryEntities) {
        if self.commodity.is_none() {
            self.commodity = other.commodity;
        }
        if self.location.is_none() {
            self.location = other.location;
        }
        if self.quantity.is_none() {
            self.quantity = other.quantity;
        }
        if self.intent_hint.is_none() {
            self.intent_hint = other.intent_hint;
        }
    }
}

/// Commodities common enough to spot by word; the live vocabulary still has
/// the final say on canonical names.
const SEED_COMMODITIES: &[&str] = &[
    "wheat", "rice", "paddy", "basmati", "maize", "bajra", "jowar", "barley",
    "onion", "potato", "tomato", "brinjal", "cabbage", "cauliflower", "okra",
    "cotton", "soybean", "soyabean", "mustard", "groundnut", "sunflower",
    "chickpea", "gram", "tur", "arhar", "moong", "urad", "masur", "lentil",
    "sugarcane", "turmeric", "chilli", "coriander", "cumin", "garlic",
    "ginger", "banana", "mango", "apple", "grapes", "pomegranate", "guava",
];

/// States and common union territories for direct location spotting
const KNOWN_STATES: &[&str] = &[
    "andhra pradesh", "arunachal pradesh", "assam", "bihar", "chhattisgarh",
    "goa", "gujarat", "haryana", "himachal pradesh", "jharkhand", "karnataka",
    "kerala", "madhya pradesh", "maharashtra", "manipur", "meghalaya",
    "mizoram", "nagaland", "odisha", "punjab", "rajasthan", "sikkim",
    "tamil nadu", "telangana", "tripura", "uttar pradesh", "uttarakhand",
    "west bengal", "delhi", "jammu and kashmir", "puducherry", "chandigarh",
];

static PINCODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{6})\b").unwrap());

/// "price of wheat", "rate for onion"
static COMMODITY_OF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:price|prices|rate|rates|bhav)\s+(?:of|for)\s+([a-z]+)").unwrap()
});

/// "sell my onion", "buy wheat"
static TRADE_COMMODITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:sell|buy|selling|buying)\s+(?:my\s+)?([a-z]+)").unwrap()
});

/// "in Karnal", "near Indore", "at Rajkot mandi"
static LOCATION_PHRASE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:in|near|at|from)\s+([A-Za-z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)*)",
    )
    .unwrap()
});

static SEED_COMMODITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", SEED_COMMODITIES.join("|"))).unwrap()
});

/// Words a location phrase must never end up being
const LOCATION_STOPWORDS: &[&str] = &[
    "the", "my", "india", "mandi", "market", "markets", "town", "village",
    "today", "tomorrow", "this", "next", "week", "month", "kg", "quintal",
];

/// Two-stage entity extractor
#[derive(Debug, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Stage 1: deterministic extraction only
    pub fn extract(&self, text: &str) -> QueryEntities {
        QueryEntities {
            commodity: extract_commodity(text),
            location: extract_location(text),
            quantity: QuantitySpec::parse(text),
            intent_hint: None,
        }
    }

    /// Stage 1 plus the LLM fallback for whatever stage 1 missed.
    ///
    /// The fallback never overrides deterministic results and an LLM
    /// failure simply leaves the gaps open.
    pub async fn extract_with_fallback(
        &self,
        text: &str,
        llm: Option<&Arc<dyn LanguageModel>>,
    ) -> QueryEntities {
        let mut entities = self.extract(text);
        if entities.commodity.is_some() && entities.location.is_some() {
            return entities;
        }

        let Some(llm) = llm else {
            return entities;
        };

        let completion = match llm.complete(&entity_extraction_prompt(text)).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "LLM entity fallback unavailable");
                return entities;
            }
        };

        let value = extract_json(&completion);
        let quantity = match (
            value.get("quantity").and_then(|v| v.as_f64()),
            string_field(&value, "unit").and_then(|u| MassUnit::from_word(&u)),
        ) {
            (Some(amount), Some(unit)) => Some(QuantitySpec::new(amount, unit)),
            _ => None,
        };

        entities.merge_missing(QueryEntities {
            commodity: string_field(&value, "commodity"),
            location: string_field(&value, "location"),
            quantity,
            intent_hint: string_field(&value, "intent")
                .as_deref()
                .and_then(QueryIntent::from_name),
        });

        entities
    }
}

fn extract_commodity(text: &str) -> Option<String> {
    // seed word scan first - most reliable across phrasings
    if let Some(caps) = SEED_COMMODITY_PATTERN.captures(text) {
        return Some(caps.get(1)?.as_str().to_lowercase());
    }

    if let Some(caps) = COMMODITY_OF_PATTERN.captures(text) {
        let candidate = caps.get(1)?.as_str().trim().to_lowercase();
        if !candidate.is_empty() {
            return Some(candidate);
        }
    }

    if let Some(caps) = TRADE_COMMODITY_PATTERN.captures(text) {
        let candidate = caps.get(1)?.as_str().trim().to_lowercase();
        if !candidate.is_empty() {
            return Some(candidate);
        }
    }

    None
}

fn extract_location(text: &str) -> Option<String> {
    // pincodes are unambiguous
    if let Some(caps) = PINCODE_PATTERN.captures(text) {
        return Some(caps.get(1)?.as_str().to_string());
    }

    // direct state names
    let lower = text.to_lowercase();
    for state in KNOWN_STATES {
        if lower.contains(state) {
            return Some((*state).to_string());
        }
    }

    // "in <Place>" phrases, filtered against stopwords and commodity words
    for caps in LOCATION_PHRASE_PATTERN.captures_iter(text) {
        let candidate = caps.get(1).map(|m| m.as_str().trim())?;
        let candidate_lower = candidate.to_lowercase();
        let first_word = candidate_lower.split_whitespace().next().unwrap_or("");
        if LOCATION_STOPWORDS.contains(&first_word)
            || SEED_COMMODITIES.contains(&first_word)
        {
            continue;
        }
        // the phrase pattern is greedy; keep the leading capitalized run only
        let place: Vec<&str> = candidate
            .split_whitespace()
            .take_while(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
            .collect();
        if !place.is_empty() {
            return Some(place.join(" "));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use krishi_agent_core::{Error, Result};

    #[test]
    fn test_commodity_seed_word() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract("what is the price of wheat today").commodity,
            Some("wheat".to_string())
        );
        assert_eq!(
            extractor.extract("top mandis to sell onion").commodity,
            Some("onion".to_string())
        );
    }

    #[test]
    fn test_commodity_of_pattern_for_unknown_words() {
        let extractor = EntityExtractor::new();
        // "kinnow" is not in the seed list; the of-pattern catches it
        assert_eq!(
            extractor.extract("price of kinnow in punjab").commodity,
            Some("kinnow".to_string())
        );
    }

    #[test]
    fn test_location_pincode_wins() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("wheat price in Jaipur 302031");
        assert_eq!(entities.location, Some("302031".to_string()));
    }

    #[test]
    fn test_location_state_name() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract("tomato price in gujarat").location,
            Some("gujarat".to_string())
        );
    }

    #[test]
    fn test_location_place_phrase() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract("price of wheat in Karnal today").location,
            Some("Karnal".to_string())
        );
    }

    #[test]
    fn test_quantity_extracted() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("selling 200 kg wheat in Karnal");
        let quantity = entities.quantity.unwrap();
        assert_eq!(quantity.amount, 200.0);
        assert_eq!(quantity.unit, MassUnit::Kilogram);
    }

    #[test]
    fn test_nothing_to_extract() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("hello there");
        assert_eq!(entities, QueryEntities::default());
    }

    struct JsonLlm(&'static str);

    #[async_trait]
    impl LanguageModel for JsonLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "json-llm"
        }
    }

    struct DeadLlm;

    #[async_trait]
    impl LanguageModel for DeadLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::Llm("down".into()))
        }

        fn model_name(&self) -> &str {
            "dead-llm"
        }
    }

    #[tokio::test]
    async fn test_fallback_fills_gaps_only() {
        let extractor = EntityExtractor::new();
        let llm: Arc<dyn LanguageModel> = Arc::new(JsonLlm(
            r#"{"commodity": "kinnow", "location": "Abohar", "intent": "get_price"}"#,
        ));

        // deterministic stage finds wheat; the fallback must not override it
        let entities = extractor
            .extract_with_fallback("wheat bhav kya hai", Some(&llm))
            .await;
        assert_eq!(entities.commodity, Some("wheat".to_string()));
        assert_eq!(entities.location, Some("Abohar".to_string()));
        assert_eq!(entities.intent_hint, Some(QueryIntent::GetPrice));
    }

    #[tokio::test]
    async fn test_fallback_failure_leaves_gaps() {
        let extractor = EntityExtractor::new();
        let llm: Arc<dyn LanguageModel> = Arc::new(DeadLlm);
        let entities = extractor
            .extract_with_fallback("bhav batao", Some(&llm))
            .await;
        assert_eq!(entities.commodity, None);
        assert_eq!(entities.location, None);
    }

    #[tokio::test]
    async fn test_complete_stage_one_skips_llm() {
        let extractor = EntityExtractor::new();
        // a DeadLlm that would error if called; complete stage-1 result
        // means it never is
        let llm: Arc<dyn LanguageModel> = Arc::new(DeadLlm);
        let entities = extractor
            .extract_with_fallback("price of wheat in Karnal", Some(&llm))
            .await;
        assert_eq!(entities.commodity, Some("wheat".to_string()));
        assert_eq!(entities.location, Some("Karnal".to_string()));
    }
}
