use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while resolving the device position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied. Please enable location access.")]
    PermissionDenied,
    #[error("Geolocation is not supported in this environment.")]
    Unsupported,
    #[error("Unable to retrieve location.")]
    PositionUnavailable,
}

/// Every way a weather query can fail. The `Display` text is meant to be
/// shown to the user as-is.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(
        "API key not configured! Add your OpenWeatherMap API key with `weather configure` \
         or the OPENWEATHER_API_KEY environment variable. Get one free at https://openweathermap.org/api"
    )]
    MisconfiguredCredential,

    #[error("Location not found. Please try again.")]
    LocationNotFound,

    #[error(
        "Invalid API key. Please check your configuration and make sure you have a valid \
         OpenWeatherMap API key."
    )]
    InvalidCredential,

    #[error("API rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Failed to fetch weather data (Error {status}): {detail}")]
    ProviderError { status: u16, detail: String },

    #[error("Could not reach the weather service: {0}")]
    TransportError(String),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl WeatherError {
    /// Classify a non-success HTTP response from the current-conditions endpoint.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => WeatherError::LocationNotFound,
            StatusCode::UNAUTHORIZED => WeatherError::InvalidCredential,
            StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimited,
            other => WeatherError::ProviderError {
                status: other.as_u16(),
                detail: truncate_body(body),
            },
        }
    }

    /// A successful response whose payload did not have the expected shape.
    pub fn malformed(status: StatusCode, detail: impl std::fmt::Display) -> Self {
        WeatherError::ProviderError {
            status: status.as_u16(),
            detail: format!("unexpected response shape: {detail}"),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::TransportError(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
