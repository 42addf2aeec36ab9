use chrono::TimeZone;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastResponse, WeatherSnapshot, round_half_up},
    reducer::reduce_daily,
};

/// m/s to km/h.
const MPS_TO_KMH: f64 = 3.6;

impl WeatherSnapshot {
    /// Build the panel payload: current conditions from the first sample, daily forecast
    /// from the rest.
    pub fn from_response<Tz: TimeZone>(
        response: &ForecastResponse,
        tz: &Tz,
    ) -> Result<Self, WeatherError> {
        let first = response.entries.first().ok_or_else(|| {
            WeatherError::Transport("Forecast response contained no samples".to_string())
        })?;

        let current = CurrentConditions {
            city: response.city.clone(),
            temperature: round_half_up(first.temperature_c),
            condition: first.condition.clone(),
            humidity: first.humidity_pct,
            wind_speed_kmh: round_half_up(first.wind_speed_mps * MPS_TO_KMH),
        };

        Ok(Self { current, forecast: reduce_daily(&response.entries, tz) })
    }
}
