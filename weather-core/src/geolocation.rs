use async_trait::async_trait;
use std::fmt::Debug;

use crate::{config::GeolocationConfig, error::GeolocationError, model::Coordinates};

/// Yields the device position on demand.
#[async_trait]
pub trait GeolocationResolver: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Position taken from the `[geolocation]` config section.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPosition {
    settings: Option<GeolocationConfig>,
}

impl ConfiguredPosition {
    pub fn new(settings: Option<GeolocationConfig>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl GeolocationResolver for ConfiguredPosition {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let settings = self.settings.as_ref().ok_or(GeolocationError::Unsupported)?;

        if !settings.enabled {
            return Err(GeolocationError::PermissionDenied);
        }

        match (settings.latitude, settings.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates { latitude, longitude }),
            _ => Err(GeolocationError::PositionUnavailable),
        }
    }
}
