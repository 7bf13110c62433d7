use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where to fetch weather for: a place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        LocationQuery::City(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationQuery::Coordinates(Coordinates { latitude, longitude })
    }

    /// Reject queries that can never resolve, before anything goes on the wire.
    pub fn validate(&self) -> Result<(), WeatherError> {
        match self {
            LocationQuery::City(name) if name.trim().is_empty() => {
                Err(WeatherError::InvalidInput("Please enter a city name".to_string()))
            }
            LocationQuery::City(_) => Ok(()),
            LocationQuery::Coordinates(Coordinates { latitude, longitude }) => {
                let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(latitude);
                let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(longitude);
                if lat_ok && lon_ok {
                    Ok(())
                } else {
                    Err(WeatherError::InvalidInput(format!(
                        "Invalid coordinates: {latitude}, {longitude}"
                    )))
                }
            }
        }
    }

    /// Location part of the provider query string.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.trim().to_string())],
            LocationQuery::Coordinates(Coordinates { latitude, longitude }) => vec![
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ],
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name.trim()),
            LocationQuery::Coordinates(Coordinates { latitude, longitude }) => {
                write!(f, "{latitude}, {longitude}")
            }
        }
    }
}

/// Measurement system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric | Units::Standard => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse weather classification used for theming and icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    #[default]
    Other,
}

impl WeatherCategory {
    /// Map the provider's `main` tag (e.g. "Clouds") onto a category.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            "haze" => Self::Haze,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Fog => "fog",
            Self::Haze => "haze",
            Self::Other => "other",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Rain => "🌧️",
            Self::Drizzle => "🌦️",
            Self::Thunderstorm => "⛈️",
            Self::Snow => "❄️",
            Self::Mist | Self::Fog | Self::Haze => "🌫️",
            Self::Other => "🌤️",
        }
    }
}

/// Present-moment snapshot for a location, already normalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    /// Whole degrees in the requested units.
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    /// hPa
    pub pressure: u32,
    pub visibility_km: f64,
    pub category: WeatherCategory,
    pub description: String,
    pub icon: String,
}

impl CurrentConditions {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon)
    }
}

/// One predicted day, taken from the provider's midday sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// The provider's own `dt_txt` label for the sample.
    pub label: NaiveDateTime,
    pub temperature: f64,
    pub category: WeatherCategory,
    pub description: String,
    pub icon: String,
}

impl ForecastEntry {
    pub fn rounded_temperature(&self) -> i32 {
        self.temperature.round() as i32
    }

    pub fn icon_url(&self) -> String {
        icon_url(&self.icon)
    }
}

/// Result of one successful query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
}

fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}
