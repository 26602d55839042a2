use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Encoding the provider is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// JSON, the provider's default. The only format parsed into a snapshot.
    #[default]
    Json,
    Xml,
    Html,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
            ResponseFormat::Html => "html",
        }
    }

    /// Value of the `mode` query parameter; `None` for the provider default.
    pub fn mode_param(&self) -> Option<&'static str> {
        match self {
            ResponseFormat::Json => None,
            ResponseFormat::Xml => Some("xml"),
            ResponseFormat::Html => Some("html"),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ResponseFormat::Json)
    }

    pub const fn all() -> &'static [ResponseFormat] {
        &[ResponseFormat::Json, ResponseFormat::Xml, ResponseFormat::Html]
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResponseFormat {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            "html" => Ok(ResponseFormat::Html),
            _ => Err(WeatherError::usage(format!(
                "Unknown response format '{value}'. Supported formats: json, xml, html."
            ))),
        }
    }
}

/// Unit system for temperature and wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin and m/s.
    #[default]
    Standard,
    /// Celsius and m/s.
    Metric,
    /// Fahrenheit and mph.
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Standard | Units::Metric => "m/s",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(WeatherError::usage(format!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            ))),
        }
    }
}

/// Response-shaping options, independent of the location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub format: ResponseFormat,
    pub units: Units,
    /// Provider language code, passed through unchecked.
    pub language: String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            format: ResponseFormat::default(),
            units: Units::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl QueryOptions {
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = language.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_json_standard_english() {
        let opts = QueryOptions::default();
        assert_eq!(opts.format, ResponseFormat::Json);
        assert_eq!(opts.units, Units::Standard);
        assert_eq!(opts.language, "en");
    }

    #[test]
    fn as_str_roundtrip() {
        for format in ResponseFormat::all() {
            assert_eq!(ResponseFormat::try_from(format.as_str()).unwrap(), *format);
        }
        for units in Units::all() {
            assert_eq!(Units::try_from(units.as_str()).unwrap(), *units);
        }
    }

    #[test]
    fn parsing_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(Units::try_from("Metric").unwrap(), Units::Metric);
        assert_eq!(ResponseFormat::try_from("XML").unwrap(), ResponseFormat::Xml);

        let err = Units::try_from("kelvin").unwrap_err();
        assert!(matches!(err, WeatherError::Usage(_)));
        assert!(err.to_string().contains("Supported units"));
    }

    #[test]
    fn only_json_is_structured_and_has_no_mode() {
        assert!(ResponseFormat::Json.is_structured());
        assert_eq!(ResponseFormat::Json.mode_param(), None);
        assert!(!ResponseFormat::Xml.is_structured());
        assert_eq!(ResponseFormat::Html.mode_param(), Some("html"));
    }

    #[test]
    fn builders_leave_other_fields_alone() {
        let opts = QueryOptions::default()
            .with_units(Units::Imperial)
            .with_language("de");

        assert_eq!(opts.format, ResponseFormat::Json);
        assert_eq!(opts.units, Units::Imperial);
        assert_eq!(opts.language, "de");
    }
}
