use async_trait::async_trait;
use reqwest::{Client, Request};
use serde_json::Value;

use crate::{
    model::LocationQuery,
    provider::{ProviderError, UpstreamOutcome, truncate_body},
};

use super::WeatherProvider;

/// OpenWeather 2.5 "current weather" endpoint.
pub const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, CURRENT_WEATHER_URL)
    }

    /// Point the provider at another endpoint (a mock server, a regional mirror).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Base endpoint, then the location parameter(s), then the credential.
    pub fn build_request(&self, query: &LocationQuery) -> Result<Request, reqwest::Error> {
        self.http
            .get(&self.base_url)
            .query(&query.upstream_params())
            .query(&[("appid", self.api_key.as_str())])
            .build()
    }
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &LocationQuery) -> Result<UpstreamOutcome, ProviderError> {
        // reqwest errors echo the URL, which carries the credential.
        let request = self.build_request(query).map_err(reqwest::Error::without_url)?;
        tracing::debug!(?query, "Forwarding current-weather request to OpenWeather");

        let res = self
            .http
            .execute(request)
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = res.status();
        let body = res.text().await.map_err(reqwest::Error::without_url)?;

        let parsed: Value = serde_json::from_str(&body).map_err(|_| ProviderError::Decode {
            status: status.as_u16(),
            snippet: truncate_body(&body),
        })?;

        if status.is_success() {
            Ok(UpstreamOutcome::Report(parsed))
        } else {
            tracing::info!(status = status.as_u16(), "OpenWeather reported a failure");
            Ok(UpstreamOutcome::Failure {
                status: status.as_u16(),
                body: parsed,
            })
        }
    }
}
