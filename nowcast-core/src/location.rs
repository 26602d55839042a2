use std::fmt;

/// Which location a current-weather query is about.
///
/// Exactly one addressing mode per query; the request builder dispatches on the case.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// City name, optionally qualified like `"London,uk"`.
    CityName(String),
    /// Provider-assigned city identifier.
    CityId(i64),
    Coordinates { lat: f64, lon: f64 },
    /// Postal code plus country code. The country code is passed through as given.
    ZipCode { code: String, country: String },
}

impl LocationSpec {
    pub fn city<S: Into<String>>(name: S) -> Self {
        LocationSpec::CityName(name.into())
    }

    pub fn city_id(id: i64) -> Self {
        LocationSpec::CityId(id)
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        LocationSpec::Coordinates { lat, lon }
    }

    pub fn zip<C: Into<String>, K: Into<String>>(code: C, country: K) -> Self {
        LocationSpec::ZipCode {
            code: code.into(),
            country: country.into(),
        }
    }

    /// Short name of the addressing mode, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LocationSpec::CityName(_) => "city name",
            LocationSpec::CityId(_) => "city id",
            LocationSpec::Coordinates { .. } => "coordinates",
            LocationSpec::ZipCode { .. } => "zip code",
        }
    }

    /// Returns the reason this spec can't address anything, if any.
    pub(crate) fn unpopulated_reason(&self) -> Option<&'static str> {
        match self {
            LocationSpec::CityName(name) if name.trim().is_empty() => Some("city name is empty"),
            LocationSpec::Coordinates { lat, lon } if !lat.is_finite() || !lon.is_finite() => {
                Some("coordinates must be finite numbers")
            }
            LocationSpec::ZipCode { code, .. } if code.trim().is_empty() => {
                Some("zip code is empty")
            }
            LocationSpec::ZipCode { country, .. } if country.trim().is_empty() => {
                Some("country code is required with a zip code")
            }
            _ => None,
        }
    }
}

impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSpec::CityName(name) => write!(f, "{name}"),
            LocationSpec::CityId(id) => write!(f, "city #{id}"),
            LocationSpec::Coordinates { lat, lon } => write!(f, "({lat}, {lon})"),
            LocationSpec::ZipCode { code, country } => write!(f, "{code}, {country}"),
        }
    }
}
