use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Condition, ForecastResponse, Location, RawForecastEntry},
};

use super::ForecastProvider;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self { api_key, endpoint, http: Client::new() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        let mut query = match location {
            Location::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
            Location::City(name) => vec![("q", name.clone())],
        };
        query.push(("units", "metric".to_string()));
        query.push(("appid", self.api_key.clone()));
        query
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_raw(self) -> Result<RawForecastEntry, WeatherError> {
        let time = unix_to_utc(self.dt).ok_or_else(|| {
            WeatherError::Transport(format!("Forecast sample has invalid timestamp {}", self.dt))
        })?;

        let condition = self
            .weather
            .first()
            .map(|w| Condition::from(w.main.as_str()))
            .unwrap_or_else(|| Condition::Other("Unknown".to_string()));

        Ok(RawForecastEntry {
            time,
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            condition,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastResponse, WeatherError> {
        debug!(%location, endpoint = %self.endpoint, "requesting forecast");

        let res = self.http.get(&self.endpoint).query(&self.query(location)).send().await?;

        let status = res.status();
        if !status.is_success() {
            warn!(%location, %status, "forecast lookup rejected");
            return Err(WeatherError::LookupFailed);
        }

        let body = res.text().await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        let entries = parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_raw)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(city = %parsed.city.name, samples = entries.len(), "forecast received");

        Ok(ForecastResponse { city: parsed.city.name, entries })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body() -> serde_json::Value {
        json!({
            "cod": "200",
            "city": { "name": "New York", "country": "US" },
            "list": [
                {
                    "dt": 1_704_067_200,
                    "main": { "temp": 15.6, "feels_like": 14.0, "humidity": 71 },
                    "weather": [{ "main": "Clouds", "description": "overcast clouds" }],
                    "wind": { "speed": 5.0 }
                },
                {
                    "dt": 1_704_078_000,
                    "main": { "temp": 14.2, "feels_like": 13.0, "humidity": 75 },
                    "weather": [],
                    "wind": { "speed": 4.1 }
                }
            ]
        })
    }

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::with_endpoint("SECRET".into(), format!("{}/forecast", server.uri()))
    }

    #[tokio::test]
    async fn city_lookup_sends_name_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "New York"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "SECRET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let res = provider(&server)
            .fetch_forecast(&Location::City("New York".into()))
            .await
            .expect("lookup should succeed");

        assert_eq!(res.city, "New York");
        assert_eq!(res.entries.len(), 2);
        assert_eq!(res.entries[0].temperature_c, 15.6);
        assert_eq!(res.entries[0].humidity_pct, 71);
        assert_eq!(res.entries[0].condition, Condition::Clouds);
        assert_eq!(res.entries[1].condition, Condition::Other("Unknown".into()));
    }

    #[tokio::test]
    async fn coordinate_lookup_sends_lat_lon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "40.5"))
            .and(query_param("lon", "-74.25"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let here = Location::Coordinates(Coordinates { lat: 40.5, lon: -74.25 });
        let res = provider(&server).fetch_forecast(&here).await;

        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Nowhere123"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_forecast(&Location::City("Nowhere123".into()))
            .await
            .unwrap_err();

        assert_eq!(err, WeatherError::LookupFailed);
        assert_eq!(err.to_string(), "City not found");
    }

    #[tokio::test]
    async fn malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_forecast(&Location::City("Paris".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let provider =
            OpenWeatherProvider::with_endpoint("KEY".into(), "http://127.0.0.1:1/forecast".into());

        let err = provider.fetch_forecast(&Location::City("Paris".into())).await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
    }
}
