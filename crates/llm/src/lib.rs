//! LLM integration
//!
//! One chat-completions HTTP backend behind the `LanguageModel` trait, plus
//! the best-effort JSON extraction the structured extractor relies on and
//! the prompt templates the agent sends.

pub mod backend;
pub mod json;
pub mod prompt;

pub use backend::HttpChatBackend;
pub use json::extract_json;
