use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::cep::Cep;
use crate::model::{Address, CurrentWeather};

pub mod viacep;
pub mod weatherapi;

pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;

/// Failure classes shared by both resolvers.
///
/// `Internal` deliberately carries no cause: the cause is logged at the call
/// site and must never cross a service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,
    #[error("internal lookup error")]
    Internal,
}

/// Resolves a validated CEP to an address.
#[async_trait]
pub trait AddressResolver: Send + Sync + Debug {
    async fn resolve(&self, cep: &Cep) -> Result<Address, ResolveError>;
}

/// Resolves a city name to its current temperature.
#[async_trait]
pub trait WeatherResolver: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<CurrentWeather, ResolveError>;
}
