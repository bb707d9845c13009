//! Text-to-speech over HTTP
//!
//! Posts `{"text": ..., "language": ...}` and expects audio bytes back.
//! Failures degrade to empty audio; the voice endpoint then answers with
//! text only.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use krishi_agent_config::SpeechConfig;
use krishi_agent_core::{Language, Result, TextToSpeech};

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    language: &'a str,
}

/// HTTP text-to-speech adapter
pub struct HttpTextToSpeech {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl HttpTextToSpeech {
    pub fn new(config: SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl TextToSpeech for HttpTextToSpeech {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let request = TtsRequest {
            text,
            language: language.code(),
        };

        let result = self
            .client
            .post(&self.config.tts_url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "TTS upstream failed, returning empty audio");
                return Ok(Vec::new());
            }
        };

        match response.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) => {
                tracing::warn!(error = %e, "TTS body read failed");
                Ok(Vec::new())
            }
        }
    }

    fn engine_name(&self) -> &str {
        "http-tts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_language_code() {
        let request = TtsRequest {
            text: "नमस्ते",
            language: Language::Hindi.code(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"language\":\"hi\""));
    }

    #[tokio::test]
    async fn test_unreachable_tts_degrades_to_empty() {
        let config = SpeechConfig {
            tts_url: "http://127.0.0.1:1/synthesize".into(),
            timeout_secs: 1,
            ..Default::default()
        };
        let tts = HttpTextToSpeech::new(config);
        let audio = tts.synthesize("hello", Language::English).await.unwrap();
        assert!(audio.is_empty());
    }
}
