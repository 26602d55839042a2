use reqwest::Url;

use crate::{
    error::{Result, WeatherError},
    location::LocationSpec,
    options::QueryOptions,
};

/// Provider endpoint for current conditions.
pub const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const REDACTED: &str = "***";

/// Builds the request URL for one query. Pure, no I/O.
///
/// Location parameters come first, then `appid`, `units`, `lang`, and `mode` only for
/// non-JSON formats. The API key is passed through as given, even when empty.
pub fn build_url(
    endpoint: &str,
    api_key: &str,
    location: &LocationSpec,
    options: &QueryOptions,
) -> Result<Url> {
    if let Some(reason) = location.unpopulated_reason() {
        return Err(WeatherError::usage(format!("location has no usable value: {reason}")));
    }

    let mut params: Vec<(&str, String)> = match location {
        LocationSpec::CityName(name) => vec![("q", encode(name))],
        LocationSpec::CityId(id) => vec![("id", id.to_string())],
        LocationSpec::Coordinates { lat, lon } => {
            vec![("lat", lat.to_string()), ("lon", lon.to_string())]
        }
        LocationSpec::ZipCode { code, country } => {
            vec![("zip", format!("{},{}", encode(code), encode(country)))]
        }
    };

    params.push(("appid", encode(api_key)));
    params.push(("units", options.units.as_str().to_string()));
    params.push(("lang", encode(&options.language)));
    if let Some(mode) = options.format.mode_param() {
        params.push(("mode", mode.to_string()));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let base = Url::parse(endpoint)
        .map_err(|e| WeatherError::usage(format!("invalid endpoint '{endpoint}': {e}")))?;
    if base.cannot_be_a_base() {
        return Err(WeatherError::usage(format!("invalid endpoint '{endpoint}'")));
    }

    let mut url = base;
    url.set_query(Some(&query));
    Ok(url)
}

/// The URL as it may appear in logs and error messages: `appid` is masked.
pub fn redacted(url: &Url) -> String {
    let Some(query) = url.query() else {
        return url.to_string();
    };

    let masked = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("appid", _)) => format!("appid={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut url = url.clone();
    url.set_query(Some(&masked));
    url.to_string()
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
