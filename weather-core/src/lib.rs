//! Core library for the weather-by-CEP services.
//!
//! This crate defines:
//! - CEP (Brazilian postal code) validation
//! - Shared domain models (address, temperatures, unified report)
//! - Abstraction over the upstream address and weather lookups
//! - The instrumented outbound HTTP transport and telemetry setup
//!
//! It is used by `weather-edge` and `weather-orchestrator`, but can also be
//! reused by other binaries or services.

pub mod cep;
pub mod model;
pub mod resolver;
pub mod telemetry;
pub mod transport;

pub use cep::{Cep, CepError};
pub use model::{Address, CurrentWeather, WeatherReport};
pub use resolver::{AddressResolver, ResolveError, WeatherResolver};
