use serde::{Deserialize, Serialize};

/// Placeholder the proxy forwards for a missing coordinate.
pub const MISSING_COORDINATE: &str = "null";

/// A device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where to look up the weather: either a free-text address or a coordinate pair.
///
/// Coordinates are kept in their textual form. The proxy forwards whatever the
/// caller sent without validation, and the provider is left to reject junk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    Address(String),
    Coordinates { lat: String, lon: String },
}

impl LocationQuery {
    /// Build a query from raw `address` / `lat` / `lon` request parameters.
    ///
    /// A non-empty address always wins. Otherwise the coordinate form is used,
    /// with [`MISSING_COORDINATE`] standing in for either missing half.
    pub fn from_params(address: Option<&str>, lat: Option<&str>, lon: Option<&str>) -> Self {
        match address {
            Some(address) if !address.is_empty() => Self::Address(address.to_string()),
            _ => Self::Coordinates {
                lat: lat.unwrap_or(MISSING_COORDINATE).to_string(),
                lon: lon.unwrap_or(MISSING_COORDINATE).to_string(),
            },
        }
    }

    /// Query parameters as the proxy expects them.
    pub fn proxy_params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Address(address) => vec![("address", address.as_str())],
            Self::Coordinates { lat, lon } => vec![("lat", lat.as_str()), ("lon", lon.as_str())],
        }
    }

    /// Query parameters as the upstream provider expects them.
    pub fn upstream_params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Address(address) => vec![("q", address.as_str())],
            Self::Coordinates { lat, lon } => vec![("lat", lat.as_str()), ("lon", lon.as_str())],
        }
    }
}

impl From<Coordinates> for LocationQuery {
    fn from(position: Coordinates) -> Self {
        Self::Coordinates {
            lat: position.latitude.to_string(),
            lon: position.longitude.to_string(),
        }
    }
}

/// One entry of the provider's `weather` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Category label such as "Rain" or "Clear".
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainBlock {
    /// Kelvin.
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Current-weather body as returned by OpenWeather, decoded leniently.
///
/// Every block is optional so that an error-shaped body still decodes; the
/// widget decides what it can render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub name: String,
}

impl WeatherReport {
    /// Only the first condition is ever displayed.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// Error payload OpenWeather sends alongside a non-2xx status,
/// e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub status: u16,
    #[serde(default)]
    pub message: String,
}
