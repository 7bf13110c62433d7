use crate::{
    error::WeatherError,
    history::{HistoryStore, SearchHistory},
    model::WeatherReport,
};

/// Everything the presentation layer renders, owned by the caller and
/// handed to [`crate::WeatherQueryService::lookup`].
#[derive(Debug, Default)]
pub struct AppState {
    current: Option<WeatherReport>,
    last_error: Option<String>,
    loading: bool,
    history: SearchHistory,
    store: Option<HistoryStore>,
}

impl AppState {
    /// In-memory state with no persisted history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the history from `store` and write it back on every change.
    /// An unreadable history file starts an empty history instead of failing.
    pub fn with_store(store: HistoryStore) -> Self {
        let history = store.load().unwrap_or_else(|err| {
            tracing::warn!(path = %store.path().display(), "ignoring search history: {err:#}");
            SearchHistory::new()
        });

        Self {
            history,
            store: Some(store),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&WeatherReport> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Drop whatever was displayed before; a new query is in flight.
    pub fn begin_query(&mut self) {
        self.current = None;
        self.last_error = None;
        self.loading = true;
    }

    /// Replace the displayed report and remember the resolved city name.
    pub fn record_success(&mut self, report: WeatherReport) {
        self.history.push(&report.current.city);
        self.persist_history();

        self.current = Some(report);
        self.last_error = None;
        self.loading = false;
    }

    pub fn record_failure(&mut self, err: &WeatherError) {
        self.current = None;
        self.last_error = Some(err.to_string());
        self.loading = false;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    fn persist_history(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.history) {
                tracing::warn!(path = %store.path().display(), "failed to save search history: {err:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, WeatherCategory};

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            current: CurrentConditions {
                city: city.to_string(),
                country: "XX".to_string(),
                temperature: 10,
                feels_like: 9,
                humidity_pct: 50,
                wind_speed: 1.0,
                pressure: 1000,
                visibility_km: 10.0,
                category: WeatherCategory::Clear,
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            },
            forecast: Vec::new(),
        }
    }

    #[test]
    fn begin_query_discards_previous_report() {
        let mut state = AppState::new();
        state.record_success(report("Paris"));
        assert!(state.current().is_some());

        state.begin_query();
        assert!(state.current().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn failure_keeps_history_and_sets_message() {
        let mut state = AppState::new();
        state.record_success(report("Paris"));

        state.begin_query();
        state.record_failure(&WeatherError::LocationNotFound);

        assert!(state.current().is_none());
        assert!(!state.is_loading());
        assert_eq!(state.last_error(), Some("Location not found. Please try again."));
        assert_eq!(state.history().entries(), ["Paris"]);
    }

    #[test]
    fn success_is_persisted_to_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        let mut state = AppState::with_store(store.clone());
        state.record_success(report("Paris"));
        state.record_success(report("London"));

        let reloaded = AppState::with_store(store);
        assert_eq!(reloaded.history().entries(), ["London", "Paris"]);
    }

    #[test]
    fn unreadable_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ broken").unwrap();

        let state = AppState::with_store(HistoryStore::new(path));
        assert!(state.history().is_empty());
    }

    #[test]
    fn clear_history_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        let mut state = AppState::with_store(store.clone());
        state.record_success(report("Paris"));
        state.clear_history();

        assert!(store.load().unwrap().is_empty());
    }
}
