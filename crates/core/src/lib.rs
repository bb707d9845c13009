//! Core traits and types for the Krishi Mitra agent
//!
//! This crate provides foundational types used across all other crates:
//! - Core traits for pluggable backends (LLM, STT/TTS, translation, document QA)
//! - Language definitions for the multilingual query round trip
//! - Quantity units and fixed-ratio conversions (quintal / kg / gram / tonne)
//! - Confidence labelling for price answers
//! - User profiles and price alerts
//! - Error types

pub mod confidence;
pub mod error;
pub mod language;
pub mod profile;
pub mod traits;
pub mod units;

pub use confidence::Confidence;
pub use error::{Error, Result};
pub use language::Language;
pub use profile::{AlertDirection, PriceAlert, ProfileStore, UserProfile};
pub use units::{MassUnit, QuantitySpec};

pub use traits::{
    // LLM
    LanguageModel,
    // Speech
    SpeechToText, TextToSpeech, Transcript,
    // Translation
    Translator,
    // Document QA
    DocumentQa, QaAnswer,
};
