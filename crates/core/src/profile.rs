//! User profiles and price alerts
//!
//! Profiles supply per-user defaults (language, location, crops) to the
//! pipelines. Storage is behind the `ProfileStore` trait so the agent can run
//! against an in-memory fake in tests and a persistent store in production
//! without touching pipeline logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::Language;

/// Per-user profile collected during onboarding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<Language>,
    /// Default location (pincode or place name) used when a query names none
    #[serde(default)]
    pub default_location: Option<String>,
    /// Crops the user grows, used by the alert scan
    #[serde(default)]
    pub crops: Vec<String>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}

/// Whether an alert fires above or below its target price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

/// A standing price watch registered by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    pub commodity: String,
    #[serde(default)]
    pub state: Option<String>,
    pub target_price_per_quintal: f64,
    pub direction: AlertDirection,
}

impl PriceAlert {
    /// Does the observed per-quintal price satisfy this alert?
    pub fn is_triggered(&self, price_per_quintal: f64) -> bool {
        match self.direction {
            AlertDirection::Above => price_per_quintal >= self.target_price_per_quintal,
            AlertDirection::Below => price_per_quintal <= self.target_price_per_quintal,
        }
    }
}

/// Key-value profile storage, keyed by user id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>>;

    async fn set(&self, profile: UserProfile) -> Result<()>;

    async fn delete(&self, user_id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_trigger_above() {
        let alert = PriceAlert {
            commodity: "Wheat".into(),
            state: None,
            target_price_per_quintal: 2400.0,
            direction: AlertDirection::Above,
        };
        assert!(alert.is_triggered(2500.0));
        assert!(alert.is_triggered(2400.0));
        assert!(!alert.is_triggered(2399.0));
    }

    #[test]
    fn test_alert_trigger_below() {
        let alert = PriceAlert {
            commodity: "Onion".into(),
            state: Some("Maharashtra".into()),
            target_price_per_quintal: 1200.0,
            direction: AlertDirection::Below,
        };
        assert!(alert.is_triggered(1000.0));
        assert!(!alert.is_triggered(1500.0));
    }
}
