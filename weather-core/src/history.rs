use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

pub const MAX_HISTORY_ENTRIES: usize = 5;

/// Key under which the list is stored in the history file.
pub const HISTORY_KEY: &str = "weatherSearchHistory";

/// Recently queried city names, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory(Vec<String>);

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `city` to the front, dropping any entry that differs only by case,
    /// and trim to [`MAX_HISTORY_ENTRIES`].
    pub fn push(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        let key = city.to_lowercase();
        self.0.retain(|c| c.to_lowercase() != key);
        self.0.insert(0, city.to_string());
        self.0.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<String>> for SearchHistory {
    fn from(entries: Vec<String>) -> Self {
        let mut history = SearchHistory::new();
        // Re-pushing oldest first keeps order while enforcing dedup and the cap.
        for city in entries.iter().rev() {
            history.push(city);
        }
        history
    }
}

/// File-backed storage for [`SearchHistory`].
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SearchHistory> {
        if !self.path.exists() {
            return Ok(SearchHistory::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;

        let mut entries: BTreeMap<String, Vec<String>> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file: {}", self.path.display()))?;

        Ok(entries.remove(HISTORY_KEY).map(SearchHistory::from).unwrap_or_default())
    }

    pub fn save(&self, history: &SearchHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let mut entries = BTreeMap::new();
        entries.insert(HISTORY_KEY, history);
        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize search history")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_is_case_insensitive_and_most_recent_first() {
        let mut history = SearchHistory::new();
        history.push("Paris");
        history.push("paris");
        history.push("London");

        assert_eq!(history.entries(), ["London", "paris"]);
    }

    #[test]
    fn sixth_city_drops_the_oldest() {
        let mut history = SearchHistory::new();
        for city in ["Oslo", "Rome", "Lima", "Kyiv", "Baku", "Doha"] {
            history.push(city);
        }

        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.entries(), ["Doha", "Baku", "Kyiv", "Lima", "Rome"]);
    }

    #[test]
    fn blank_names_are_ignored() {
        let mut history = SearchHistory::new();
        history.push("  ");
        assert!(history.is_empty());
    }

    #[test]
    fn from_vec_enforces_cap_and_dedup() {
        let history = SearchHistory::from(vec![
            "A".to_string(),
            "b".to_string(),
            "B".to_string(),
            "c".to_string(),
            "d".to_string(),
            "e".to_string(),
            "f".to_string(),
        ]);

        assert_eq!(history.entries(), ["A", "b", "c", "d", "e"]);
    }

    #[test]
    fn store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("data").join("history.json"));

        let mut history = SearchHistory::new();
        history.push("Paris");
        history.push("London");
        store.save(&history).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(HISTORY_KEY));

        assert_eq!(store.load().unwrap(), history);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn oversized_file_is_truncated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(
            &path,
            r#"{"weatherSearchHistory": ["a", "b", "c", "d", "e", "f", "g"]}"#,
        )
        .unwrap();

        let history = HistoryStore::new(&path).load().unwrap();
        assert_eq!(history.entries(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        let err = HistoryStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse history file"));
    }
}
