//! One-shot position lookup for the "use my location" action.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{error::WeatherError, model::Coordinates};

pub const IP_API_ENDPOINT: &str = "http://ip-api.com/json/";

/// Yields exactly one position or one error per call.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

#[async_trait]
impl<T: Geolocator + ?Sized> Geolocator for Box<T> {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        (**self).locate().await
    }
}

/// Resolves the machine's approximate position from its public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    endpoint: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new() -> Self {
        Self::with_endpoint(IP_API_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self { endpoint, http: Client::new() }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "geolocation service unreachable");
                WeatherError::GeolocationUnavailable
            })?;

        if !res.status().is_success() {
            warn!(status = %res.status(), "geolocation service rejected the request");
            return Err(WeatherError::GeolocationUnavailable);
        }

        let body: IpApiResponse = res.json().await.map_err(|e| {
            warn!(error = %e, "geolocation response could not be parsed");
            WeatherError::GeolocationUnavailable
        })?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                debug!(lat, lon, "located by IP");
                Ok(Coordinates { lat, lon })
            }
            _ => {
                warn!(reason = body.message.as_deref().unwrap_or("unknown"), "geolocation refused");
                Err(WeatherError::GeolocationDenied)
            }
        }
    }
}

/// Stands in when geolocation is switched off; every call fails without I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::GeolocationUnavailable)
    }
}
