//! Application state wiring

use std::path::Path;
use std::sync::Arc;

use krishi_agent_agent::{AlertCenter, InMemoryProfileStore, KrishiAgent};
use krishi_agent_config::Settings;
use krishi_agent_core::{LanguageModel, ProfileStore, SpeechToText, TextToSpeech};
use krishi_agent_geo::{GeoResolver, WeatherClient};
use krishi_agent_llm::HttpChatBackend;
use krishi_agent_market::{MarketDataClient, MarketService};
use krishi_agent_rag::{DocumentIndex, KnowledgeBase};
use krishi_agent_speech::{HttpSpeechToText, HttpTextToSpeech, HttpTranslator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub agent: Arc<KrishiAgent>,
    pub market: Arc<MarketService>,
    pub profiles: Arc<dyn ProfileStore>,
    pub alerts: Arc<AlertCenter>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
}

impl AppState {
    /// Wire every component from settings.
    ///
    /// The document index is optional equipment: a missing file logs a
    /// warning and document questions get an honest miss.
    pub fn from_settings(settings: Settings) -> Self {
        let market = Arc::new(MarketService::new(Arc::new(MarketDataClient::new(
            settings.market.clone(),
        ))));
        let geo = Arc::new(GeoResolver::new(settings.geo.clone()));
        let weather = Arc::new(WeatherClient::new(settings.weather.clone()));

        let llm: Arc<dyn LanguageModel> =
            Arc::new(HttpChatBackend::new(settings.llm.clone()));

        let index = match DocumentIndex::load(Path::new(&settings.rag.index_path)) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(error = %e, "Running without a document index");
                DocumentIndex::empty()
            }
        };
        let qa = Arc::new(KnowledgeBase::new(
            Arc::new(index),
            Arc::clone(&llm),
            settings.rag.top_k,
        ));

        let translator = Arc::new(HttpTranslator::new(settings.speech.clone()));
        let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());

        let agent = Arc::new(KrishiAgent::new(
            Arc::clone(&market),
            geo,
            weather,
            qa,
            translator,
            Some(llm),
            Arc::clone(&profiles),
        ));

        Self {
            settings: Arc::new(settings.clone()),
            agent,
            market,
            profiles,
            alerts: Arc::new(AlertCenter::new()),
            stt: Arc::new(HttpSpeechToText::new(settings.speech.clone())),
            tts: Arc::new(HttpTextToSpeech::new(settings.speech)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wires_from_default_settings() {
        let mut settings = Settings::default();
        settings.market.api_key = "test-key".into();
        let state = AppState::from_settings(settings);
        assert_eq!(state.settings.market.api_key, "test-key");
    }
}
