//! Weather widget state machine.
//!
//! Holds the typed location, a loading flag, an error message and the last
//! fetch result, and derives one of four views from them. Fetches never
//! overlap in intent but may overlap in time; each one is stamped with a
//! generation number and only the newest is allowed to settle the state.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    geolocation::{GeolocationError, Geolocator},
    model::{LocationQuery, UpstreamFailure, WeatherReport},
};

pub mod view;

pub use view::{FETCH_FAILED_MESSAGE, NO_DATA_MESSAGE, ReportView, WidgetView};

/// Result of a proxy round-trip that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Report(WeatherReport),
    UpstreamFailure(UpstreamFailure),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Geolocation is not supported on this device")]
    GeolocationUnsupported,

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("failed to reach the weather proxy: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather proxy answered with status {0}")]
    Status(u16),

    #[error("weather proxy returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a [`LocationQuery`], normally the proxy endpoint.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, query: &LocationQuery) -> Result<FetchOutcome, FetchError>;
}

#[derive(Debug)]
struct WidgetState {
    location: String,
    loading: bool,
    error: Option<&'static str>,
    data: Option<FetchOutcome>,
}

#[derive(Debug)]
pub struct Widget {
    source: Arc<dyn WeatherSource>,
    geolocator: Option<Arc<dyn Geolocator>>,
    state: Mutex<WidgetState>,
    generation: AtomicU64,
}

impl Widget {
    /// A widget with no geolocator treats the capability as unsupported.
    pub fn new(source: Arc<dyn WeatherSource>, geolocator: Option<Arc<dyn Geolocator>>) -> Self {
        Self {
            source,
            geolocator,
            state: Mutex::new(WidgetState {
                location: String::new(),
                loading: true,
                error: None,
                data: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn set_location(&self, text: impl Into<String>) {
        self.state.lock().location = text.into();
    }

    /// First render: fetch with whatever is typed, which is nothing yet.
    pub async fn mount(&self) -> WidgetView {
        self.fetch_weather_report().await
    }

    /// Form submission: re-run the fetch with the current input text.
    pub async fn submit(&self) -> WidgetView {
        self.fetch_weather_report().await
    }

    pub async fn fetch_weather_report(&self) -> WidgetView {
        let (ticket, location) = self.begin();
        let result = self.run(&location).await;
        self.settle(ticket, result);
        self.view()
    }

    pub fn view(&self) -> WidgetView {
        self.view_on(Local::now().date_naive())
    }

    /// Derive the current view as if today were `today`.
    pub fn view_on(&self, today: NaiveDate) -> WidgetView {
        let state = self.state.lock();

        if state.loading {
            return WidgetView::Loading;
        }
        if let Some(message) = state.error {
            return WidgetView::Error(message.to_string());
        }
        match &state.data {
            Some(FetchOutcome::Report(report)) => ReportView::from_report(report, today)
                .map(WidgetView::Report)
                .unwrap_or(WidgetView::Empty),
            _ => WidgetView::Empty,
        }
    }

    fn begin(&self) -> (u64, String) {
        let mut state = self.state.lock();
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.loading = true;
        state.error = None;
        (ticket, state.location.clone())
    }

    async fn run(&self, location: &str) -> Result<FetchOutcome, FetchError> {
        let query = self.build_query(location).await?;
        self.source.fetch(&query).await
    }

    /// Typed text first, then the device position, else unsupported.
    async fn build_query(&self, location: &str) -> Result<LocationQuery, FetchError> {
        if !location.is_empty() {
            return Ok(LocationQuery::Address(location.to_string()));
        }

        let geolocator = self
            .geolocator
            .as_ref()
            .ok_or(FetchError::GeolocationUnsupported)?;
        let position = geolocator.current_position().await?;

        Ok(position.into())
    }

    /// Apply a finished fetch unless a newer one has started since.
    fn settle(&self, ticket: u64, result: Result<FetchOutcome, FetchError>) -> bool {
        let mut state = self.state.lock();

        let current = self.generation.load(Ordering::SeqCst);
        if current != ticket {
            tracing::debug!(ticket, current, "Discarding stale weather fetch");
            return false;
        }

        match result {
            Ok(FetchOutcome::UpstreamFailure(failure)) => {
                tracing::warn!(
                    status = failure.status,
                    message = %failure.message,
                    "Weather provider reported a failure"
                );
                state.data = Some(FetchOutcome::UpstreamFailure(failure));
            }
            Ok(outcome) => state.data = Some(outcome),
            Err(err) => {
                tracing::error!(error = %err, "Error fetching weather report");
                state.error = Some(FETCH_FAILED_MESSAGE);
            }
        }
        state.loading = false;
        true
    }
}
