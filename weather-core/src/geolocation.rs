//! Single-shot device positioning used when no location was typed.
//!
//! There is no continuous tracking: each call resolves one position or fails.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::model::Coordinates;

/// Free IP geolocation endpoint. No key required.
pub const IP_API_URL: &str = "http://ip-api.com/json";

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("position lookup was refused: {0}")]
    Denied(String),

    #[error("position lookup failed: {0}")]
    Unavailable(#[from] reqwest::Error),
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Always answers with the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Approximates the device position from its public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let res: IpApiResponse = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (res.status.as_str(), res.lat, res.lon) {
            ("success", Some(latitude), Some(longitude)) => {
                tracing::debug!(latitude, longitude, "Resolved position from IP address");
                Ok(Coordinates { latitude, longitude })
            }
            _ => Err(GeolocationError::Denied(
                res.message.unwrap_or_else(|| "no position in reply".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fixed_position_is_returned_as_is() {
        let here = Coordinates { latitude: 51.5, longitude: -0.12 };
        let pos = FixedPosition(here).current_position().await.expect("fixed");
        assert_eq!(pos, here);
    }

    #[tokio::test]
    async fn ip_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success", "lat": 48.85, "lon": 2.35
            })))
            .mount(&server)
            .await;

        let pos = IpGeolocator::with_url(format!("{}/json", server.uri()))
            .current_position()
            .await
            .expect("position");

        assert_eq!(pos, Coordinates { latitude: 48.85, longitude: 2.35 });
    }

    #[tokio::test]
    async fn ip_lookup_failure_is_a_denial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "fail", "message": "reserved range"
            })))
            .mount(&server)
            .await;

        let err = IpGeolocator::with_url(server.uri())
            .current_position()
            .await
            .unwrap_err();

        assert!(matches!(err, GeolocationError::Denied(ref m) if m == "reserved range"));
    }
}
