//! JSON file store for the monitor document.
//!
//! A missing file means no run has completed yet.

use crate::domain::error::WatchError;
use crate::domain::monitor::MonitorDocument;
use crate::ports::state_port::StatePort;
use super::atomic_file::write_json_atomic;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct JsonStateAdapter {
    path: PathBuf,
}

impl JsonStateAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, reason: impl ToString) -> WatchError {
        WatchError::StatePersist {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl StatePort for JsonStateAdapter {
    fn load(&self) -> Result<Option<MonitorDocument>, WatchError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.persist_error(e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.persist_error(format!("corrupt state document: {e}")))
    }

    fn replace(&self, document: &MonitorDocument) -> Result<(), WatchError> {
        write_json_atomic(&self.path, document).map_err(|e| self.persist_error(e))?;
        tracing::debug!(path = %self.path.display(), date = %document.date, "state replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::monitor::DOCUMENT_VERSION;
    use crate::domain::signal::SignalState;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_document() -> MonitorDocument {
        MonitorDocument {
            version: DOCUMENT_VERSION,
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            price: 1.021,
            rsi: 33.7,
            signal_state: SignalState::Oversold,
            last_fired_date: NaiveDate::from_ymd_opt(2024, 3, 8),
            buy_threshold: 40.0,
            sell_threshold: 70.0,
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateAdapter::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn replace_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateAdapter::new(dir.path().join("state.json"));

        store.replace(&sample_document()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_document()));

        let mut next = sample_document();
        next.date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        next.signal_state = SignalState::Neutral;
        store.replace(&next).unwrap();
        assert_eq!(store.load().unwrap(), Some(next));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = JsonStateAdapter::new(path.clone());
        store.replace(&sample_document()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn written_json_is_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        JsonStateAdapter::new(path.clone())
            .replace(&sample_document())
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"signalState\": \"OVERSOLD\""));
        assert!(raw.contains("\"lastFiredDate\": \"2024-03-08\""));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateAdapter::new(dir.path().join("state.json"));
        store.replace(&sample_document()).unwrap();
        store.replace(&sample_document()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn corrupt_file_is_state_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonStateAdapter::new(path).load();
        assert!(matches!(result, Err(WatchError::StatePersist { .. })));
    }
}
