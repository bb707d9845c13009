//! Language definitions for the multilingual query round trip
//!
//! Queries arrive in any of the major Indian languages (text or voice); the
//! pipelines work in English and the answer is translated back. Only the
//! languages the translation and TTS collaborators actually serve are listed.

use serde::{Deserialize, Serialize};

/// Languages accepted on the question/answer round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Marathi,
    Telugu,
    Tamil,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
    Odia,
    Assamese,
}

impl Language {
    /// ISO 639-1 code, as used by the translation and TTS services
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Bengali => "bn",
            Self::Marathi => "mr",
            Self::Telugu => "te",
            Self::Tamil => "ta",
            Self::Gujarati => "gu",
            Self::Kannada => "kn",
            Self::Malayalam => "ml",
            Self::Punjabi => "pa",
            Self::Odia => "or",
            Self::Assamese => "as",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Bengali => "Bengali",
            Self::Marathi => "Marathi",
            Self::Telugu => "Telugu",
            Self::Tamil => "Tamil",
            Self::Gujarati => "Gujarati",
            Self::Kannada => "Kannada",
            Self::Malayalam => "Malayalam",
            Self::Punjabi => "Punjabi",
            Self::Odia => "Odia",
            Self::Assamese => "Assamese",
        }
    }

    /// Parse a language code or name (case-insensitive); unknown codes fall
    /// back to English rather than failing, since an unrecognised detection
    /// result must not break the answer path.
    pub fn from_code_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "hi" | "hin" | "hindi" => Self::Hindi,
            "bn" | "ben" | "bengali" | "bangla" => Self::Bengali,
            "mr" | "mar" | "marathi" => Self::Marathi,
            "te" | "tel" | "telugu" => Self::Telugu,
            "ta" | "tam" | "tamil" => Self::Tamil,
            "gu" | "guj" | "gujarati" => Self::Gujarati,
            "kn" | "kan" | "kannada" => Self::Kannada,
            "ml" | "mal" | "malayalam" => Self::Malayalam,
            "pa" | "pan" | "punjabi" | "panjabi" => Self::Punjabi,
            "or" | "ori" | "odia" | "oriya" => Self::Odia,
            "as" | "asm" | "assamese" => Self::Assamese,
            _ => Self::English,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        assert_eq!(Language::Hindi.code(), "hi");
        assert_eq!(Language::from_code_lossy("hi"), Language::Hindi);
        assert_eq!(Language::from_code_lossy("Bangla"), Language::Bengali);
    }

    #[test]
    fn test_unknown_code_falls_back_to_english() {
        assert_eq!(Language::from_code_lossy("xx"), Language::English);
        assert_eq!(Language::from_code_lossy(""), Language::English);
    }
}
