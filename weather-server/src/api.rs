use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use weather_core::{
    Config, LocationQuery, ProviderError, WeatherProvider, provider::UPSTREAM_STATUS_HEADER,
    provider_from_config,
};

#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::from(provider_from_config(config)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/weather", get(weather))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Raw query parameters. Nothing is validated here.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub address: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Relay the provider's body with a 200, whatever the provider said.
async fn weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Response, ApiError> {
    let query = LocationQuery::from_params(
        params.address.as_deref(),
        params.lat.as_deref(),
        params.lon.as_deref(),
    );

    let outcome = state.provider.current_weather(&query).await?;
    let upstream_status = outcome.status();

    Ok((
        StatusCode::OK,
        [(UPSTREAM_STATUS_HEADER, upstream_status.to_string())],
        Json(outcome.into_body()),
    )
        .into_response())
}

/// The provider could not be reached or answered with something other than JSON.
#[derive(Debug)]
pub struct ApiError(ProviderError);

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Weather provider call failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "weather provider unavailable" })),
        )
            .into_response()
    }
}
