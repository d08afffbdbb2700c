//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - A resilient HTTP transport: per-attempt timeouts, bounded retry with
//!   exponential backoff, and an optional request-lifecycle event hook
//! - A structured error taxonomy shared by every operation
//! - Geocoding (place name → coordinates) and current-weather lookup
//!   against the Open-Meteo endpoints
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or
//! services. The crate itself never logs or prints; install a transport
//! event hook for diagnostics.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod transport;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::Error;
pub use location::LocationResolver;
pub use model::{CurrentWeather, Location};
pub use transport::{RetryPolicy, Transport, TransportEvent};
pub use weather::WeatherReader;
