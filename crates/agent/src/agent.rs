//! The Krishi Mitra agent
//!
//! One linear pass per question: detect language, work in English, classify
//! intent, extract entities, run the matching backend, translate the answer
//! back. Every failure on the way turns into user-facing prose; the
//! transport layer never sees an error from here.

use std::sync::Arc;

use krishi_agent_core::{DocumentQa, Language, LanguageModel, ProfileStore, Translator};
use krishi_agent_geo::{weather::format_forecast, GeoResolver, GeoScope, WeatherClient};
use krishi_agent_market::{MarketQuery, MarketService, TradeDirection};

use crate::extract::EntityExtractor;
use crate::intent::{classify, QueryIntent};

/// Answer with the metadata the HTTP layer exposes
#[derive(Debug, Clone)]
pub struct AgentAnswer {
    pub answer: String,
    /// Language the answer is phrased in (the user's language)
    pub language: Language,
    /// Which backend produced the answer
    pub source: &'static str,
}

const SOURCE_INTERNAL: &str = "Internal Logic";
const SOURCE_WEATHER: &str = "Open-Meteo Weather API";
const SOURCE_MARKET: &str = "Mandi Price Dataset";
const SOURCE_KNOWLEDGE: &str = "Knowledge Base (Documents)";

/// The assistant's request-scope orchestrator
pub struct KrishiAgent {
    market: Arc<MarketService>,
    geo: Arc<GeoResolver>,
    weather: Arc<WeatherClient>,
    qa: Arc<dyn DocumentQa>,
    translator: Arc<dyn Translator>,
    llm: Option<Arc<dyn LanguageModel>>,
    profiles: Arc<dyn ProfileStore>,
    extractor: EntityExtractor,
}

impl KrishiAgent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market: Arc<MarketService>,
        geo: Arc<GeoResolver>,
        weather: Arc<WeatherClient>,
        qa: Arc<dyn DocumentQa>,
        translator: Arc<dyn Translator>,
        llm: Option<Arc<dyn LanguageModel>>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            market,
            geo,
            weather,
            qa,
            translator,
            llm,
            profiles,
            extractor: EntityExtractor::new(),
        }
    }

    /// Answer a user question, handling the language round trip
    pub async fn ask(&self, user_id: &str, query_text: &str) -> AgentAnswer {
        let query = query_text.trim();
        if query.is_empty() {
            return AgentAnswer {
                answer: "Please ask me a question - about mandi prices, the \
                         weather, or farming practices."
                    .to_string(),
                language: Language::English,
                source: SOURCE_INTERNAL,
            };
        }

        let language = self
            .translator
            .detect(query)
            .await
            .unwrap_or(Language::English);

        let english = if language != Language::English {
            self.translator
                .translate(query, Some(language), Language::English)
                .await
                .unwrap_or_else(|_| query.to_string())
        } else {
            query.to_string()
        };

        let (answer_en, source) = self.answer_english(user_id, &english).await;

        let answer = if language != Language::English {
            self.translator
                .translate(&answer_en, Some(Language::English), language)
                .await
                .unwrap_or(answer_en)
        } else {
            answer_en
        };

        AgentAnswer {
            answer,
            language,
            source,
        }
    }

    /// Route an English query to the right backend
    async fn answer_english(&self, user_id: &str, english: &str) -> (String, &'static str) {
        let mut intent = classify(english);
        let entities = self
            .extractor
            .extract_with_fallback(english, self.llm.as_ref())
            .await;

        // the LLM's intent hint only upgrades an unclassified query
        if intent == QueryIntent::Knowledge {
            if let Some(hint) = entities.intent_hint {
                intent = hint;
            }
        }

        tracing::info!(
            user_id,
            ?intent,
            commodity = entities.commodity.as_deref().unwrap_or("-"),
            location = entities.location.as_deref().unwrap_or("-"),
            "Routing query"
        );

        // fall back to the profile's default location when the query has none
        let location = match &entities.location {
            Some(l) => Some(l.clone()),
            None => self
                .profiles
                .get(user_id)
                .await
                .ok()
                .flatten()
                .and_then(|p| p.default_location),
        };

        match intent {
            QueryIntent::Weather => self.weather_answer(location.as_deref()).await,
            intent if intent.is_market() => {
                self.market_answer(user_id, intent, english, &entities, location)
                    .await
            }
            _ => match self.qa.answer(english).await {
                Ok(qa) => (qa.answer, SOURCE_KNOWLEDGE),
                Err(e) => {
                    tracing::warn!(error = %e, "Document QA failed");
                    (
                        "I could not consult my reference documents just now. \
                         Please try again in a moment."
                            .to_string(),
                        SOURCE_KNOWLEDGE,
                    )
                }
            },
        }
    }

    async fn weather_answer(&self, location: Option<&str>) -> (String, &'static str) {
        let Some(location) = location else {
            return (
                "I can get the weather for you, but please mention a city or \
                 pincode."
                    .to_string(),
                SOURCE_INTERNAL,
            );
        };

        let Some(coords) = self.geo.coords_for(location).await else {
            return (
                format!(
                    "Sorry, I couldn't find the location '{location}'. Please \
                     be more specific."
                ),
                SOURCE_WEATHER,
            );
        };

        let scope = self.geo.resolve(location).await;
        let label = if scope.is_resolved() {
            scope.scope_label.clone()
        } else {
            location.to_string()
        };

        match self.weather.tomorrow(coords).await {
            Some(day) => (format_forecast(&label, &day), SOURCE_WEATHER),
            None => (
                format!("Weather data for {label} is unavailable right now."),
                SOURCE_WEATHER,
            ),
        }
    }

    async fn market_answer(
        &self,
        user_id: &str,
        intent: QueryIntent,
        english: &str,
        entities: &crate::extract::QueryEntities,
        location: Option<String>,
    ) -> (String, &'static str) {
        let scope = match &location {
            Some(l) => {
                let scope = self.geo.resolve(l).await;
                if !scope.is_resolved() {
                    return (
                        format!(
                            "I couldn't determine where '{l}' is. Please give \
                             a district, state or 6-digit pincode."
                        ),
                        SOURCE_INTERNAL,
                    );
                }
                scope
            }
            // no location at all is fine - prices go national
            None => GeoScope::national(),
        };

        self.remember_location(user_id, &location, &scope).await;

        let query = MarketQuery {
            scope,
            commodity_text: entities.commodity.clone(),
            quantity: entities.quantity,
        };

        let answer = match intent {
            QueryIntent::GetPrice => self.market.price_answer(&query).await,
            QueryIntent::BestSell => {
                self.market
                    .best_markets_answer(&query, TradeDirection::Sell)
                    .await
            }
            QueryIntent::BestBuy => {
                self.market
                    .best_markets_answer(&query, TradeDirection::Buy)
                    .await
            }
            QueryIntent::Trend => self.market.trend_answer(&query).await,
            QueryIntent::ComparePrices => {
                self.market
                    .compare_answer(&query, english, krishi_agent_market::pipelines::DEFAULT_WINDOW_DAYS)
                    .await
            }
            QueryIntent::OfferEvaluation => self.market.offer_answer(&query, english).await,
            _ => unreachable!("market_answer called for non-market intent"),
        };

        (answer, SOURCE_MARKET)
    }

    /// Write-through of the last successfully resolved location as the
    /// user's default
    async fn remember_location(&self, user_id: &str, location: &Option<String>, scope: &GeoScope) {
        let Some(location) = location else { return };
        if !scope.is_resolved() {
            return;
        }

        let mut profile = self
            .profiles
            .get(user_id)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| krishi_agent_core::UserProfile::new(user_id));
        profile.default_location = Some(location.clone());
        if let Err(e) = self.profiles.set(profile).await {
            tracing::warn!(error = %e, "Could not persist default location");
        }
    }
}
