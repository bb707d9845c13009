//! Agricultural weather forecast
//!
//! Fetches tomorrow's forecast with the parameters a farmer acts on
//! (precipitation, soil conditions, evapotranspiration) and formats it as a
//! readable answer.

use std::time::Duration;

use serde::Deserialize;

use krishi_agent_config::WeatherConfig;

use crate::resolver::Coordinates;

/// Daily forecast parameters requested from the weather API
const DAILY_PARAMS: &[&str] = &[
    "temperature_2m_max",
    "temperature_2m_min",
    "relative_humidity_2m_mean",
    "precipitation_sum",
    "precipitation_probability_max",
    "windspeed_10m_max",
    "shortwave_radiation_sum",
    "et0_fao_evapotranspiration",
    "soil_temperature_0_to_7cm_mean",
    "soil_moisture_0_to_7cm_mean",
];

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

/// Per-day series, index-aligned with `time`
#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
    #[serde(default)]
    precipitation_probability_max: Vec<f64>,
    #[serde(default)]
    windspeed_10m_max: Vec<f64>,
    #[serde(default)]
    shortwave_radiation_sum: Vec<f64>,
    #[serde(default)]
    et0_fao_evapotranspiration: Vec<f64>,
    #[serde(default)]
    soil_temperature_0_to_7cm_mean: Vec<f64>,
    #[serde(default)]
    soil_moisture_0_to_7cm_mean: Vec<f64>,
}

/// One day of agricultural weather, already picked out of the series
#[derive(Debug, Clone, PartialEq)]
pub struct AgriForecastDay {
    pub date: String,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub humidity_mean_pct: f64,
    pub precipitation_mm: f64,
    pub precipitation_probability_pct: f64,
    pub wind_max_kmh: f64,
    pub radiation_mj_m2: f64,
    pub et0_mm: f64,
    pub soil_temp_c: f64,
    pub soil_moisture_m3: f64,
}

impl DailyBlock {
    /// Pick one day out of the index-aligned series; `1` is tomorrow.
    fn day(&self, index: usize) -> Option<AgriForecastDay> {
        let at = |series: &Vec<f64>| series.get(index).copied();
        Some(AgriForecastDay {
            date: self.time.get(index)?.clone(),
            temp_max_c: at(&self.temperature_2m_max)?,
            temp_min_c: at(&self.temperature_2m_min)?,
            humidity_mean_pct: at(&self.relative_humidity_2m_mean)?,
            precipitation_mm: at(&self.precipitation_sum)?,
            precipitation_probability_pct: at(&self.precipitation_probability_max)?,
            wind_max_kmh: at(&self.windspeed_10m_max)?,
            radiation_mj_m2: at(&self.shortwave_radiation_sum)?,
            et0_mm: at(&self.et0_fao_evapotranspiration)?,
            soil_temp_c: at(&self.soil_temperature_0_to_7cm_mean)?,
            soil_moisture_m3: at(&self.soil_moisture_0_to_7cm_mean)?,
        })
    }
}

/// Format one forecast day as the user-facing answer
pub fn format_forecast(location_label: &str, day: &AgriForecastDay) -> String {
    format!(
        "Agricultural weather forecast for {} on {}:\n\
         - Air temperature: max {:.1}°C, min {:.1}°C.\n\
         - Humidity: average of {:.0}%.\n\
         - Precipitation: {:.1} mm expected, with a {:.0}% chance of rain.\n\
         - Soil conditions: average soil temperature (0-7 cm) of {:.1}°C, \
         average soil moisture of {:.3} m³/m³.\n\
         - Wind speed: max of {:.1} km/h.\n\
         - Sunlight: total solar radiation of {:.1} MJ/m².\n\
         - Water loss (evapotranspiration ET₀): {:.1} mm.",
        location_label,
        day.date,
        day.temp_max_c,
        day.temp_min_c,
        day.humidity_mean_pct,
        day.precipitation_mm,
        day.precipitation_probability_pct,
        day.soil_temp_c,
        day.soil_moisture_m3,
        day.wind_max_kmh,
        day.radiation_mj_m2,
        day.et0_mm,
    )
}

/// Weather forecast client
pub struct WeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Tomorrow's forecast for the given coordinates, or `None` when the
    /// service is unreachable or the series is too short.
    pub async fn tomorrow(&self, coords: Coordinates) -> Option<AgriForecastDay> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let daily = DAILY_PARAMS.join(",");

        let result = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("daily", daily.as_str()),
                ("timezone", self.config.timezone.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Weather upstream request failed");
                return None;
            }
        };

        match response.json::<ForecastResponse>().await {
            // Index 1 is tomorrow; index 0 is today.
            Ok(forecast) => forecast.daily.day(1),
            Err(e) => {
                tracing::warn!(error = %e, "Weather upstream returned undecodable body");
                None
            }
        }
    }
}
