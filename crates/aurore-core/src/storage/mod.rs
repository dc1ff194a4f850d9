//! Persistence for Aurore.
//!
//! Every record is a whole-object JSON string stored under a fixed key,
//! the same way the mobile app kept them in device storage. The
//! [`KeyValueStore`] trait is the only seam: [`Database`] backs it with
//! SQLite on disk, [`MemoryStore`] keeps everything in a map.

mod config;
pub mod database;
pub mod memory;

pub use config::{Config, FormConfig, ProfileConfig, SleepConfig};
pub use database::Database;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::StorageError;

/// Keys of the persisted records.
pub mod keys {
    /// `"true"` once the welcome screen was acknowledged.
    pub const SEEN_WELCOME: &str = "hasSeenWelcome";
    /// Raw questionnaire answers.
    pub const QUESTIONNAIRE: &str = "questionnaireData";
    /// User profile record.
    pub const USER_PROFILE: &str = "userData";
    /// Sleep templates list.
    pub const TEMPLATES: &str = "templates";
    /// Sleep log, keyed by date.
    pub const SLEEP_LOG: &str = "sleepData";
    /// Running sleep session, if any.
    pub const SLEEP_TRACKING: &str = "sleepTracking";
}

/// String-keyed record store.
///
/// Reads and writes take `&self`; implementations serialise access
/// internally. Every call completes before the next one starts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

/// Read and decode a JSON record. Absent keys yield `Ok(None)`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode a record as JSON and write it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Returns the data directory, creating it if needed.
///
/// `AURORE_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/aurore/`, or `~/.config/aurore-dev/` when `AURORE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("AURORE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("AURORE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("aurore-dev")
            } else {
                base_dir.join("aurore")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn load_json_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Sample> = load_json(&store, "nothing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_then_load_json() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "night".into(),
            count: 3,
        };
        save_json(&store, "sample", &sample).unwrap();
        let loaded: Sample = load_json(&store, "sample").unwrap().unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn load_json_reports_malformed_record() {
        let store = MemoryStore::new();
        store.set("sample", "{not json").unwrap();
        let result: Result<Option<Sample>, _> = load_json(&store, "sample");
        assert!(matches!(result, Err(StorageError::Malformed { ref key, .. }) if key == "sample"));
    }
}
