//! Core library for the `skycast` weather panel.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather forecast fetcher and one-shot geolocation
//! - The daily reducer that turns 3-hour samples into a 5-day forecast
//! - The panel state machine and the controller that drives it
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod reducer;
pub mod snapshot;
pub mod state;

pub use chrono::Weekday;
pub use config::Config;
pub use controller::WeatherController;
pub use error::WeatherError;
pub use geolocation::{DisabledGeolocator, Geolocator, IpGeolocator};
pub use model::{
    Condition, Coordinates, CurrentConditions, DailyForecast, ForecastResponse, Location,
    RawForecastEntry, WeatherSnapshot,
};
pub use provider::{ForecastProvider, openweather::OpenWeatherProvider};
pub use reducer::reduce_daily;
pub use state::{Event, PanelState, Status, View};
