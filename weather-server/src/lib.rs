//! HTTP surface of the weather proxy.
//!
//! Exposed as a library so integration tests can drive the router without
//! opening sockets.

pub mod api;

pub use api::{AppState, router};
