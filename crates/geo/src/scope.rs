//! Geographic scope of a market query

use serde::{Deserialize, Serialize};

/// Granularity at which market records are filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    National,
    State,
    District,
}

/// Resolved location for a request.
///
/// Invariant: `district` is only ever set together with `state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoScope {
    pub scope_type: ScopeType,
    /// Display label for answers ("Karnal", "Punjab", "India")
    pub scope_label: String,
    pub state: Option<String>,
    pub district: Option<String>,
}

impl GeoScope {
    /// Country-wide scope, used when the query names no location
    pub fn national() -> Self {
        Self {
            scope_type: ScopeType::National,
            scope_label: "India".to_string(),
            state: None,
            district: None,
        }
    }

    /// Assemble a scope from whatever resolution produced.
    ///
    /// A district without a state cannot be filtered on upstream, so it is
    /// dropped rather than violating the invariant.
    pub fn from_parts(state: Option<String>, district: Option<String>) -> Self {
        let state = state.filter(|s| !s.trim().is_empty());
        let district = district.filter(|d| !d.trim().is_empty());
        match (&state, &district) {
            (Some(s), Some(d)) => Self {
                scope_type: ScopeType::District,
                scope_label: format!("{d}, {s}"),
                state,
                district,
            },
            (Some(s), None) => Self {
                scope_type: ScopeType::State,
                scope_label: s.clone(),
                state,
                district: None,
            },
            _ => Self::national(),
        }
    }

    /// Whether resolution produced anything narrower than national
    pub fn is_resolved(&self) -> bool {
        self.state.is_some()
    }
}

impl std::fmt::Display for GeoScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scope_label)
    }
}
