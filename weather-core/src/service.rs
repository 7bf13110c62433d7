use std::sync::Arc;

use crate::{
    error::WeatherError,
    model::{LocationQuery, WeatherReport},
    provider::WeatherProvider,
    state::AppState,
};

/// Runs one location query against a [`WeatherProvider`]: current conditions
/// and forecast are fetched concurrently, and a failed forecast only costs
/// the forecast.
#[derive(Debug, Clone)]
pub struct WeatherQueryService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherQueryService {
    pub fn new(provider: impl WeatherProvider + 'static) -> Self {
        Self { provider: Arc::new(provider) }
    }

    pub async fn fetch_weather(&self, query: &LocationQuery) -> Result<WeatherReport, WeatherError> {
        query.validate()?;
        self.provider.check_credential()?;

        let current = {
            let provider = Arc::clone(&self.provider);
            let query = query.clone();
            tokio::spawn(async move { provider.current(&query).await })
        };
        let forecast = {
            let provider = Arc::clone(&self.provider);
            let query = query.clone();
            tokio::spawn(async move { provider.forecast(&query).await })
        };

        let (current, forecast) = tokio::join!(current, forecast);

        let current = current
            .map_err(|e| WeatherError::TransportError(format!("current conditions task failed: {e}")))??;

        let forecast = match forecast {
            Ok(Ok(days)) => days,
            Ok(Err(err)) => {
                tracing::warn!(%query, "forecast unavailable, continuing without it: {err}");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(%query, "forecast task failed, continuing without it: {err}");
                Vec::new()
            }
        };

        tracing::debug!(city = %current.city, days = forecast.len(), "weather resolved");

        Ok(WeatherReport { current, forecast })
    }

    /// [`Self::fetch_weather`], with the outcome recorded in `state`.
    pub async fn lookup(
        &self,
        state: &mut AppState,
        query: &LocationQuery,
    ) -> Result<WeatherReport, WeatherError> {
        state.begin_query();

        match self.fetch_weather(query).await {
            Ok(report) => {
                state.record_success(report.clone());
                Ok(report)
            }
            Err(err) => {
                state.record_failure(&err);
                Err(err)
            }
        }
    }
}
