use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What to look up: a free-text city or a geolocated position.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates(Coordinates),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City(name) => f.write_str(name),
            Location::Coordinates(c) => write!(f, "{:.4},{:.4}", c.lat, c.lon),
        }
    }
}

/// Provider condition label (`weather[0].main`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    /// Any other label (Mist, Drizzle, Haze...), kept verbatim.
    Other(String),
}

impl Condition {
    pub fn label(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Other(label) => label,
        }
    }
}

impl From<&str> for Condition {
    fn from(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "clear" => Condition::Clear,
            "clouds" => Condition::Clouds,
            "rain" => Condition::Rain,
            "snow" => Condition::Snow,
            "thunderstorm" => Condition::Thunderstorm,
            _ => Condition::Other(label.to_string()),
        }
    }
}

impl From<String> for Condition {
    fn from(label: String) -> Self {
        Condition::from(label.as_str())
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One 3-hour provider sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastEntry {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: Condition,
}

/// Parsed provider answer: the resolved city name and its ordered samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse {
    pub city: String,
    pub entries: Vec<RawForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: Weekday,
    pub temperature: i64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature: i64,
    pub condition: Condition,
    pub humidity: u8,
    pub wind_speed_kmh: i64,
}

/// Everything the panel shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

/// Rounds half up (`-2.5 -> -2`, `15.5 -> 16`), unlike `f64::round`.
///
/// `f64::round` is exact and rounds halves away from zero; negative halves are moved up.
pub fn round_half_up(value: f64) -> i64 {
    let rounded = value.round();
    if value - rounded == 0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}
