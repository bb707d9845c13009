//! Speech interfaces
//!
//! Audio passes through as opaque bytes; the codecs, sample rates and model
//! details belong to the external speech services.

use async_trait::async_trait;

use crate::{Language, Result};

/// Result of transcribing an audio clip
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Recognized text, empty when nothing was understood
    pub text: String,
    /// Language the engine believes was spoken, when reported
    pub language: Option<Language>,
}

/// Speech-to-text interface
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe a complete audio clip
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript>;

    /// Engine name for logging
    fn engine_name(&self) -> &str;
}

/// Text-to-speech interface
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Synthesize spoken audio for the given text and language
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>>;

    /// Engine name for logging
    fn engine_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStt;

    #[async_trait]
    impl SpeechToText for MockStt {
        async fn transcribe(&self, _audio: &[u8]) -> Result<Transcript> {
            Ok(Transcript {
                text: "wheat price in karnal".to_string(),
                language: Some(Language::English),
            })
        }

        fn engine_name(&self) -> &str {
            "mock-stt"
        }
    }

    #[tokio::test]
    async fn test_mock_stt() {
        let stt = MockStt;
        let transcript = stt.transcribe(&[0u8; 4]).await.unwrap();
        assert_eq!(transcript.text, "wheat price in karnal");
        assert_eq!(transcript.language, Some(Language::English));
    }
}
