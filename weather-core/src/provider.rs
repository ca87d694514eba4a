use crate::{Config, LocationQuery, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

/// Response header the proxy uses to pass on the provider's own status code.
pub const UPSTREAM_STATUS_HEADER: &str = "x-upstream-status";

/// What the upstream provider said, kept apart from transport failures.
///
/// Both variants carry the provider's JSON body untouched so the proxy can
/// relay it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    Report(Value),
    Failure { status: u16, body: Value },
}

impl UpstreamOutcome {
    pub fn status(&self) -> u16 {
        match self {
            UpstreamOutcome::Report(_) => 200,
            UpstreamOutcome::Failure { status, .. } => *status,
        }
    }

    pub fn into_body(self) -> Value {
        match self {
            UpstreamOutcome::Report(body) | UpstreamOutcome::Failure { body, .. } => body,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to reach the weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider returned a non-JSON body (status {status}): {snippet}")]
    Decode { status: u16, snippet: String },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issue exactly one upstream request for `query`.
    async fn current_weather(&self, query: &LocationQuery) -> Result<UpstreamOutcome, ProviderError>;
}

/// Construct the upstream provider from config.
///
/// A missing API key is not an error here: the request goes out with an empty
/// credential and the provider answers with its own 401 body.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    let api_key = config.api_key.clone().unwrap_or_else(|| {
        tracing::warn!(
            "No OpenWeather API key configured; upstream requests will be rejected.\n\
             Hint: set OPENWEATHER_API_KEY or run `weather configure`."
        );
        String::new()
    });

    Box::new(OpenWeatherProvider::with_base_url(api_key, config.upstream_url()))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
