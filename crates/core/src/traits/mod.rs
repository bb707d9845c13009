//! Trait interfaces for external collaborators
//!
//! The LLM, speech engines, translator and document-QA pipeline are outside
//! collaborators: the agent only depends on these interfaces, and every
//! adapter is swappable for a mock in tests.

pub mod llm;
pub mod qa;
pub mod speech;
pub mod text;

pub use llm::LanguageModel;
pub use qa::{DocumentQa, QaAnswer};
pub use speech::{SpeechToText, TextToSpeech, Transcript};
pub use text::Translator;
