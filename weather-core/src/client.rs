use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    model::{LocationQuery, UpstreamFailure, WeatherReport},
    provider::UPSTREAM_STATUS_HEADER,
    widget::{FetchError, FetchOutcome, WeatherSource},
};

/// Path of the proxy endpoint, relative to the proxy base URL.
pub const WEATHER_PATH: &str = "/api/weather";

/// Talks to the weather proxy on behalf of the widget.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    endpoint: String,
    http: Client,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), WEATHER_PATH),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Decide whether a relayed body is a report or the provider's error payload.
///
/// The proxy's status header is authoritative; without it, a `cod` other than
/// 200 marks an error body.
pub fn classify(upstream_status: Option<u16>, body: Value) -> Result<FetchOutcome, FetchError> {
    let status = upstream_status.or_else(|| body_status(&body)).unwrap_or(200);

    if (200..300).contains(&status) {
        let report: WeatherReport = serde_json::from_value(body)?;
        return Ok(FetchOutcome::Report(report));
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(FetchOutcome::UpstreamFailure(UpstreamFailure { status, message }))
}

// OpenWeather sends `cod` as a number on success and as a string on errors.
fn body_status(body: &Value) -> Option<u16> {
    match body.get("cod")? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl WeatherSource for ProxyClient {
    async fn fetch(&self, query: &LocationQuery) -> Result<FetchOutcome, FetchError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&query.proxy_params())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let upstream_status = res
            .headers()
            .get(UPSTREAM_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body: Value = serde_json::from_slice(&res.bytes().await?)?;
        classify(upstream_status, body)
    }
}
