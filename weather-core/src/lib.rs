//! Core library for the weather proxy and its widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream OpenWeather provider the proxy forwards to
//! - Shared domain models (location queries, weather reports)
//! - The widget state machine, its view model and the proxy client it uses
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod client;
pub mod config;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod widget;

pub use client::ProxyClient;
pub use config::Config;
pub use geolocation::{FixedPosition, GeolocationError, Geolocator, IpGeolocator};
pub use model::{Coordinates, LocationQuery, UpstreamFailure, WeatherReport};
pub use provider::{ProviderError, UpstreamOutcome, WeatherProvider, provider_from_config};
pub use widget::{FetchError, FetchOutcome, WeatherSource, Widget, WidgetView};
