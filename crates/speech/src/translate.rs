//! Translation over HTTP
//!
//! Posts `{"q": ..., "source": ..., "target": ...}` and expects
//! `{"translatedText": ..., "detectedLanguage": ...}`. The degrade rule is
//! input-unchanged: if the service is down, the original text (or English,
//! for detection) comes back and the conversation continues untranslated.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use krishi_agent_config::SpeechConfig;
use krishi_agent_core::{Language, Result, Translator};

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText", default)]
    translated_text: String,
    #[serde(rename = "detectedLanguage", default)]
    detected_language: Option<String>,
}

/// HTTP translation adapter
pub struct HttpTranslator {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl HttpTranslator {
    pub fn new(config: SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    async fn call(&self, text: &str, source: &str, target: &str) -> Option<TranslateResponse> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
        };

        let result = self
            .client
            .post(&self.config.translate_url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Translation upstream failed");
                return None;
            }
        };

        match response.json::<TranslateResponse>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(error = %e, "Translation returned undecodable body");
                None
            }
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn detect(&self, text: &str) -> Result<Language> {
        // Detection rides on a no-op translation request.
        let detected = self
            .call(text, "auto", "en")
            .await
            .and_then(|r| r.detected_language)
            .map(|code| Language::from_code_lossy(&code))
            .unwrap_or(Language::English);
        Ok(detected)
    }

    async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        if source == Some(target) {
            return Ok(text.to_string());
        }

        let source_code = source.map(|l| l.code()).unwrap_or("auto");
        match self.call(text, source_code, target.code()).await {
            Some(body) if !body.translated_text.trim().is_empty() => Ok(body.translated_text),
            // input-unchanged fallback
            _ => Ok(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead_translator() -> HttpTranslator {
        HttpTranslator::new(SpeechConfig {
            translate_url: "http://127.0.0.1:1/translate".into(),
            timeout_secs: 1,
            ..Default::default()
        })
    }

    #[test]
    fn test_response_decode() {
        let raw = r#"{"translatedText":"What is the wheat price","detectedLanguage":"hi"}"#;
        let body: TranslateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.translated_text, "What is the wheat price");
        assert_eq!(body.detected_language.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_dead_service_returns_input_unchanged() {
        let translator = dead_translator();
        let text = "gehu ka bhav";
        let out = translator
            .translate(text, None, Language::English)
            .await
            .unwrap();
        assert_eq!(out, text);
    }

    #[tokio::test]
    async fn test_dead_service_detects_english() {
        let translator = dead_translator();
        assert_eq!(
            translator.detect("whatever").await.unwrap(),
            Language::English
        );
    }

    #[tokio::test]
    async fn test_same_language_skips_call() {
        let translator = dead_translator();
        let out = translator
            .translate("hello", Some(Language::English), Language::English)
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }
}
