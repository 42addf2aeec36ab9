use thiserror::Error;

/// Failures that end one lookup. Each one surfaces as a single message in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The provider answered with a non-success status, e.g. an unknown city.
    #[error("City not found")]
    LookupFailed,

    /// Network or decoding failure; carries the underlying message.
    #[error("{0}")]
    Transport(String),

    #[error("Geolocation is not supported on this platform")]
    GeolocationUnavailable,

    #[error("Error getting location. Please try entering a city name.")]
    GeolocationDenied,
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("Failed to parse forecast JSON: {err}"))
    }
}
