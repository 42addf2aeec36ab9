use crate::{
    Config,
    error::WeatherError,
    model::{ForecastResponse, Location},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of raw forecast samples for a location.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastResponse, WeatherError>;
}

/// Construct the OpenWeather provider from config, resolving the API key.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.resolve_api_key()?;
    let endpoint = config.endpoint();

    Ok(OpenWeatherProvider::with_endpoint(api_key, endpoint))
}
