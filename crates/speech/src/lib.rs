//! Speech and translation adapters
//!
//! Thin HTTP clients implementing the core traits. All three degrade
//! instead of failing the request: a dead STT returns an empty transcript,
//! a dead TTS returns empty audio, a dead translator returns the input
//! unchanged.

pub mod stt;
pub mod translate;
pub mod tts;

pub use stt::HttpSpeechToText;
pub use translate::HttpTranslator;
pub use tts::HttpTextToSpeech;
