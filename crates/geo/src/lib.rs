//! Location resolution and weather lookup
//!
//! Turns a raw location mention (6-digit pincode or free-text place name)
//! into a market query scope, and fetches the agricultural weather forecast
//! for a resolved coordinate. All upstream failures degrade to partial
//! information; nothing here raises past the component boundary.

pub mod resolver;
pub mod scope;
pub mod weather;

pub use resolver::GeoResolver;
pub use scope::{GeoScope, ScopeType};
pub use weather::WeatherClient;
