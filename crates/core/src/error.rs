//! Shared error types
//!
//! Upstream failures are recovered close to where they happen and converted
//! into empty/sentinel results; these variants exist for the trait boundaries
//! where a failure still has to travel as a value.

use thiserror::Error;

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Agent-wide error type
#[derive(Error, Debug)]
pub enum Error {
    /// An upstream HTTP service could not be reached or returned non-2xx
    #[error("upstream {service} unavailable: {message}")]
    Upstream { service: String, message: String },

    /// LLM completion failed
    #[error("llm error: {0}")]
    Llm(String),

    /// Speech-to-text or text-to-speech failed
    #[error("speech error: {0}")]
    Speech(String),

    /// Translation or language detection failed
    #[error("translation error: {0}")]
    Translation(String),

    /// Document retrieval / QA failed
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Caller passed something unusable (empty query, bad audio, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Shorthand for an upstream failure
    pub fn upstream(service: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        let err = Error::upstream("postal", "connection refused");
        assert_eq!(
            err.to_string(),
            "upstream postal unavailable: connection refused"
        );
    }
}
