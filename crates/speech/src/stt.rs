//! Speech-to-text over HTTP
//!
//! Posts the raw audio clip and expects `{"text": ..., "language": ...}`
//! back. Failures degrade to an empty transcript; the caller turns that
//! into a "could not understand the audio" reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use krishi_agent_config::SpeechConfig;
use krishi_agent_core::{Language, Result, SpeechToText, Transcript};

#[derive(Debug, Deserialize)]
struct SttResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// HTTP speech-to-text adapter
pub struct HttpSpeechToText {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl HttpSpeechToText {
    pub fn new(config: SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechToText {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript> {
        let result = self
            .client
            .post(&self.config.stt_url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "STT upstream failed, returning empty transcript");
                return Ok(Transcript::default());
            }
        };

        match response.json::<SttResponse>().await {
            Ok(body) => Ok(Transcript {
                text: body.text.trim().to_string(),
                language: body.language.as_deref().map(Language::from_code_lossy),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "STT returned undecodable body");
                Ok(Transcript::default())
            }
        }
    }

    fn engine_name(&self) -> &str {
        "http-stt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_decode() {
        let raw = r#"{"text":" gehu ka bhav batao ","language":"hi"}"#;
        let body: SttResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.text.trim(), "gehu ka bhav batao");
        assert_eq!(body.language.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_unreachable_stt_degrades_to_empty() {
        let config = SpeechConfig {
            stt_url: "http://127.0.0.1:1/transcribe".into(),
            timeout_secs: 1,
            ..Default::default()
        };
        let stt = HttpSpeechToText::new(config);
        let transcript = stt.transcribe(&[1, 2, 3]).await.unwrap();
        assert!(transcript.text.is_empty());
        assert!(transcript.language.is_none());
    }
}
