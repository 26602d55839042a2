use serde::{Deserialize, Serialize};

use crate::options::ResponseFormat;

/// Current conditions for one location, as reported by the provider.
///
/// Values are exactly what the provider sent; temperature and wind speed are in the
/// unit system the query asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub city_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Short condition group, e.g. "Clouds".
    pub title: String,
    /// Localized detail, e.g. "overcast clouds".
    pub description: String,
    pub temperature: f64,
    /// hPa
    pub pressure: i64,
    /// Percent.
    pub humidity: i64,
    pub wind_speed: f64,
    /// Meteorological degrees.
    pub wind_direction: i64,
    /// Percent.
    pub cloud_cover: i64,
}

/// Response body returned as-is, for any format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub format: ResponseFormat,
    pub body: String,
}
