//! Translation and language detection interface

use async_trait::async_trait;

use crate::{Language, Result};

/// Translation / language-detection interface
///
/// Adapters are expected to degrade by returning the input unchanged when
/// the service is unreachable; a hard error is reserved for misuse.
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Detect the language of the given text
    async fn detect(&self, text: &str) -> Result<Language>;

    /// Translate text between languages; `source` None means auto-detect
    async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Identity translator, the degraded behavior adapters fall back to
    struct PassthroughTranslator;

    #[async_trait]
    impl Translator for PassthroughTranslator {
        async fn detect(&self, _text: &str) -> Result<Language> {
            Ok(Language::English)
        }

        async fn translate(
            &self,
            text: &str,
            _source: Option<Language>,
            _target: Language,
        ) -> Result<String> {
            Ok(text.to_string())
        }
    }

    #[tokio::test]
    async fn test_passthrough() {
        let t = PassthroughTranslator;
        assert_eq!(t.detect("hello").await.unwrap(), Language::English);
        assert_eq!(
            t.translate("hello", None, Language::Hindi).await.unwrap(),
            "hello"
        );
    }
}
