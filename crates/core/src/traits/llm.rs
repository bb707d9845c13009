//! Language Model interface
//!
//! The LLM is consumed for two things only: the fallback structured entity
//! extractor and prose composition for document QA. Both are plain
//! prompt-in/text-out calls; best-effort JSON parsing of the output lives
//! with the caller, not the backend.

use async_trait::async_trait;

use crate::Result;

/// Text completion interface
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion for a single prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLlm;

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok("Mock response".to_string())
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    #[tokio::test]
    async fn test_mock_llm() {
        let llm = MockLlm;
        assert_eq!(llm.model_name(), "mock-llm");
        assert_eq!(llm.complete("hello").await.unwrap(), "Mock response");
    }
}
