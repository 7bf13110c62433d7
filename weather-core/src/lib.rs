//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Location queries and the normalized weather models
//! - The OpenWeather provider and the concurrent query service
//! - Application state with a persisted search history
//! - Configuration, credentials and on-demand geolocation
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod history;
pub mod model;
pub mod provider;
pub mod service;
pub mod state;

pub use config::{Config, GeolocationConfig};
pub use error::{GeolocationError, WeatherError};
pub use geolocation::{ConfiguredPosition, GeolocationResolver};
pub use history::{HistoryStore, SearchHistory};
pub use model::{
    Coordinates, CurrentConditions, ForecastEntry, LocationQuery, Units, WeatherCategory,
    WeatherReport,
};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use service::WeatherQueryService;
pub use state::AppState;
