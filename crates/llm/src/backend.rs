//! Chat-completions HTTP backend
//!
//! Speaks the widely-shared chat-completions wire shape (Mistral, OpenAI,
//! and most self-hosted gateways). The agent only needs single-prompt
//! completions; streaming and tool calling are out of scope here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use krishi_agent_config::LlmConfig;
use krishi_agent_core::{Error, LanguageModel, Result};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

/// `LanguageModel` over a chat-completions endpoint
pub struct HttpChatBackend {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpChatBackend {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl LanguageModel for HttpChatBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Llm(e.to_string()))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        tracing::debug!(
            model = self.config.model.as_str(),
            chars = text.len(),
            "LLM completion received"
        );

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
