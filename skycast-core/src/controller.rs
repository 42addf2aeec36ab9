//! Drives lookups and publishes every panel transition.

use chrono::{Local, TimeZone};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::WeatherError,
    geolocation::Geolocator,
    model::{Location, WeatherSnapshot},
    provider::ForecastProvider,
    state::{Event, PanelState, RequestId},
};

/// City fetched when the panel first comes up and no other default is configured.
pub const DEFAULT_CITY: &str = "New York";

#[derive(Debug)]
pub struct WeatherController<P, G, Tz: TimeZone = Local> {
    provider: P,
    geolocator: G,
    tz: Tz,
    default_city: String,
    next_request: AtomicU64,
    state: watch::Sender<PanelState>,
}

impl<P, G> WeatherController<P, G, Local>
where
    P: ForecastProvider,
    G: Geolocator,
{
    pub fn new(provider: P, geolocator: G) -> Self {
        Self::with_timezone(provider, geolocator, Local)
    }
}

impl<P, G, Tz> WeatherController<P, G, Tz>
where
    P: ForecastProvider,
    G: Geolocator,
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    /// Weekday labels of the daily forecast are taken in `tz`.
    pub fn with_timezone(provider: P, geolocator: G, tz: Tz) -> Self {
        let (state, _) = watch::channel(PanelState::default());
        Self {
            provider,
            geolocator,
            tz,
            default_city: DEFAULT_CITY.to_string(),
            next_request: AtomicU64::new(1),
            state,
        }
    }

    pub fn default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Initial fetch of the default city.
    pub async fn refresh_default(&self) {
        let city = self.default_city.clone();
        self.search(&city).await;
    }

    /// Look up a city by name. Blank input is ignored.
    pub async fn search(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            debug!("ignoring empty search");
            return;
        }

        let request = self.begin();
        self.fetch(request, Location::City(city.to_string())).await;
    }

    /// Look up the forecast for wherever the geolocator says we are.
    pub async fn locate(&self) {
        let request = self.begin();

        match self.geolocator.locate().await {
            Ok(coords) => self.fetch(request, Location::Coordinates(coords)).await,
            Err(err) => self.fail(request, err),
        }
    }

    fn begin(&self) -> RequestId {
        let request = self.next_request.fetch_add(1, Ordering::Relaxed);
        self.apply(Event::Started { request });
        request
    }

    async fn fetch(&self, request: RequestId, location: Location) {
        info!(request, %location, "fetching forecast");

        let outcome = self
            .provider
            .fetch_forecast(&location)
            .await
            .and_then(|res| WeatherSnapshot::from_response(&res, &self.tz));

        match outcome {
            Ok(snapshot) => self.apply(Event::Succeeded { request, snapshot }),
            Err(err) => self.fail(request, err),
        }
    }

    fn fail(&self, request: RequestId, err: WeatherError) {
        warn!(request, error = %err, "lookup failed");
        self.apply(Event::Failed { request, message: err.to_string() });
    }

    fn apply(&self, event: Event) {
        let request = event.request();
        self.state.send_modify(|state| {
            let before = state.latest_request();
            *state = std::mem::take(state).apply(event);
            if request < before {
                debug!(request, latest = before, "dropped stale completion");
            }
        });
    }
}
