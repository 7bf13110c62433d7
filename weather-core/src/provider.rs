use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastEntry, LocationQuery},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of current conditions and daily forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fails with [`WeatherError::MisconfiguredCredential`] when no usable
    /// credential is configured. Must not touch the network.
    fn check_credential(&self) -> Result<(), WeatherError>;

    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError>;

    /// At most one entry per calendar day.
    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastEntry>, WeatherError>;
}
