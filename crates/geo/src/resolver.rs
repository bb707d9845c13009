//! Multi-step location resolution
//!
//! Resolution order mirrors the data quality of the upstreams:
//! 1. 6-digit pincode -> postal lookup (district + state directly)
//! 2. otherwise, geocoding search (country-restricted) for coordinates and a
//!    first state estimate
//! 3. reverse-geocode the coordinates for a second state/district estimate;
//!    the reverse-geocoded state wins when both exist
//!
//! Any upstream failure is treated as "not found" for that sub-step; a fully
//! unresolved location surfaces as a national scope, never as an error.

use std::time::Duration;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use krishi_agent_config::GeoConfig;

use crate::scope::GeoScope;

static PINCODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{6})\b").unwrap());

/// Extract a 6-digit pincode from free text, if present
pub fn extract_pincode(text: &str) -> Option<&str> {
    PINCODE_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct PostalEntry {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice", default)]
    post_offices: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "District", default)]
    district: Option<String>,
    #[serde(rename = "State", default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeHit>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country_code: Option<String>,
    /// First-level administrative area, i.e. the state
    #[serde(default)]
    admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(rename = "principalSubdivision", default)]
    principal_subdivision: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    locality: Option<String>,
}

/// Location resolver with per-input memoization.
///
/// Geocoding is deterministic for a given input string, so resolved scopes
/// are memoized for the life of the process.
pub struct GeoResolver {
    client: reqwest::Client,
    config: GeoConfig,
    memo: DashMap<String, GeoScope>,
}

impl GeoResolver {
    pub fn new(config: GeoConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            config,
            memo: DashMap::new(),
        }
    }

    /// Resolve a raw location mention into a market query scope.
    ///
    /// Never fails: full resolution failure yields a national scope, which
    /// the pipelines surface as "cannot determine location" prose.
    pub async fn resolve(&self, location_text: &str) -> GeoScope {
        let key = location_text.trim().to_lowercase();
        if key.is_empty() {
            return GeoScope::national();
        }
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }

        let scope = self.resolve_uncached(location_text).await;
        tracing::debug!(
            location = location_text,
            scope = %scope,
            "Resolved location"
        );
        self.memo.insert(key, scope.clone());
        scope
    }

    async fn resolve_uncached(&self, location_text: &str) -> GeoScope {
        // Pincodes are authoritative: the postal lookup carries both
        // district and state.
        if let Some(pincode) = extract_pincode(location_text) {
            if let Some((district, state)) = self.lookup_pincode(pincode).await {
                return GeoScope::from_parts(Some(state), Some(district));
            }
        }

        // Named lookup gives a state estimate plus coordinates; the reverse
        // geocode of those coordinates is preferred for state and is the
        // only source of district here.
        let hit = self.search_place(location_text).await;
        let mut state = hit.as_ref().and_then(|h| h.admin1.clone());
        let mut district = None;

        if let Some(coords) = hit.map(|h| Coordinates {
            latitude: h.latitude,
            longitude: h.longitude,
        }) {
            if let Some(reverse) = self.reverse_geocode(coords).await {
                if reverse.principal_subdivision.is_some() {
                    state = reverse.principal_subdivision;
                }
                district = reverse.city.or(reverse.locality);
            }
        }

        GeoScope::from_parts(state, district)
    }

    /// Coordinates for a location mention, pincode-aware (the numeric form
    /// is fed to the geocoder verbatim; the country filter still applies).
    pub async fn coords_for(&self, location_text: &str) -> Option<Coordinates> {
        let query = extract_pincode(location_text).unwrap_or(location_text);
        self.search_place(query).await.map(|h| Coordinates {
            latitude: h.latitude,
            longitude: h.longitude,
        })
    }

    async fn lookup_pincode(&self, pincode: &str) -> Option<(String, String)> {
        let url = format!("{}/{}", self.config.postal_base_url, pincode);
        let entries: Vec<PostalEntry> = match self.get_json(&url, &[]).await {
            Some(v) => v,
            None => return None,
        };

        let entry = entries.into_iter().next()?;
        if !entry.status.eq_ignore_ascii_case("success") {
            return None;
        }
        let office = entry.post_offices?.into_iter().next()?;
        match (office.district, office.state) {
            (Some(d), Some(s)) if !d.is_empty() && !s.is_empty() => Some((d, s)),
            _ => None,
        }
    }

    async fn search_place(&self, name: &str) -> Option<GeocodeHit> {
        let response: GeocodeResponse = self
            .get_json(
                &self.config.geocode_base_url,
                &[
                    ("name", name),
                    ("count", "1"),
                    ("language", "en"),
                    ("format", "json"),
                ],
            )
            .await?;

        let hit = response.results?.into_iter().next()?;
        // Only accept results inside the configured country.
        if hit.country_code.as_deref() != Some(self.config.country_code.as_str()) {
            tracing::debug!(name, "Geocode hit outside country filter, discarding");
            return None;
        }
        Some(hit)
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Option<ReverseGeocodeResponse> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        self.get_json(
            &self.config.reverse_base_url,
            &[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("localityLanguage", "en"),
            ],
        )
        .await
    }

    /// GET + JSON decode with all failures collapsed to None
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Option<T> {
        let result = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url, error = %e, "Geo upstream request failed");
                return None;
            }
        };

        match response.json::<T>().await {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(url, error = %e, "Geo upstream returned undecodable body");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pincode() {
        assert_eq!(
            extract_pincode("wheat price in 302031 today"),
            Some("302031")
        );
        assert_eq!(extract_pincode("price in Karnal"), None);
        // 7+ digit runs are not pincodes
        assert_eq!(extract_pincode("call 9876543210"), None);
    }

    #[test]
    fn test_postal_response_decode() {
        let raw = r#"[{"Message":"Number of pincode(s) found:1","Status":"Success",
            "PostOffice":[{"Name":"Sanganer","District":"Jaipur","State":"Rajasthan"}]}]"#;
        let entries: Vec<PostalEntry> = serde_json::from_str(raw).unwrap();
        let office = entries[0].post_offices.as_ref().unwrap();
        assert_eq!(office[0].district.as_deref(), Some("Jaipur"));
        assert_eq!(office[0].state.as_deref(), Some("Rajasthan"));
    }

    #[test]
    fn test_geocode_response_decode() {
        let raw = r#"{"results":[{"latitude":29.68,"longitude":76.99,
            "country_code":"IN","admin1":"Haryana","name":"Karnal"}]}"#;
        let response: GeocodeResponse = serde_json::from_str(raw).unwrap();
        let hit = &response.results.unwrap()[0];
        assert_eq!(hit.admin1.as_deref(), Some("Haryana"));
        assert_eq!(hit.country_code.as_deref(), Some("IN"));
    }

    #[test]
    fn test_reverse_response_decode() {
        let raw = r#"{"principalSubdivision":"Haryana","city":"Karnal","locality":"Karnal Tehsil"}"#;
        let response: ReverseGeocodeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.principal_subdivision.as_deref(), Some("Haryana"));
        assert_eq!(response.city.as_deref(), Some("Karnal"));
    }

    #[tokio::test]
    async fn test_empty_input_is_national() {
        let resolver = GeoResolver::new(GeoConfig::default());
        let scope = resolver.resolve("   ").await;
        assert!(!scope.is_resolved());
        assert_eq!(scope.scope_label, "India");
    }
}
