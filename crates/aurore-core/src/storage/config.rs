//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Questionnaire navigation and transition timings
//! - Profile defaults for unanswered questions
//! - Sleep quality thresholds
//!
//! Configuration is stored at `~/.config/aurore/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::form::{EngineConfig, NavigationMode, TransitionTiming};
use crate::profile::{ProfileDefaults, SleepGoal};
use crate::sleep::QualityThresholds;

const CONFIG_FILE: &str = "config.toml";

/// Questionnaire configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub navigation: NavigationMode,
    #[serde(default = "default_fade_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_in_ms: u64,
}

/// Values used when a questionnaire answer is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_name")]
    pub default_name: String,
    #[serde(default = "default_bedtime")]
    pub default_bedtime: String,
    #[serde(default = "default_wakeup_time")]
    pub default_wakeup_time: String,
    #[serde(default)]
    pub default_sleep_goal: SleepGoal,
}

/// Minimum hours per quality grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepConfig {
    #[serde(default = "default_excellent")]
    pub excellent_hours: f64,
    #[serde(default = "default_good")]
    pub good_hours: f64,
    #[serde(default = "default_fair")]
    pub fair_hours: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/aurore/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub sleep: SleepConfig,
}

// Default functions
fn default_fade_ms() -> u64 {
    300
}
fn default_name() -> String {
    "User".into()
}
fn default_bedtime() -> String {
    "10:00 pm".into()
}
fn default_wakeup_time() -> String {
    "6:00 am".into()
}
fn default_excellent() -> f64 {
    8.0
}
fn default_good() -> f64 {
    7.0
}
fn default_fair() -> f64 {
    6.0
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationMode::default(),
            fade_out_ms: default_fade_ms(),
            fade_in_ms: default_fade_ms(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_name: default_name(),
            default_bedtime: default_bedtime(),
            default_wakeup_time: default_wakeup_time(),
            default_sleep_goal: SleepGoal::default(),
        }
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            excellent_hours: default_excellent(),
            good_hours: default_good(),
            fair_hours: default_fair(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from disk, writing the defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// [`load`](Self::load) from an explicit path.
    ///
    /// # Errors
    /// See [`load`](Self::load).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// See [`save`](Self::save).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a leaf value by dot-separated key. The change is in memory only;
    /// call [`save`](Self::save) to persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// All leaf keys with their values, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Thresholds must descend: excellent >= good >= fair >= 0.
    ///
    /// # Errors
    /// Returns `InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sleep;
        let checks = [
            ("sleep.fair_hours", s.fair_hours >= 0.0),
            ("sleep.good_hours", s.good_hours >= s.fair_hours),
            ("sleep.excellent_hours", s.excellent_hours >= s.good_hours),
        ];
        match checks.into_iter().find(|(_, ok)| !ok) {
            Some((key, _)) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "thresholds must satisfy excellent >= good >= fair >= 0".to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            navigation: self.form.navigation,
            timing: TransitionTiming {
                fade_out_ms: self.form.fade_out_ms,
                fade_in_ms: self.form.fade_in_ms,
            },
        }
    }

    pub fn profile_defaults(&self) -> ProfileDefaults {
        ProfileDefaults {
            name: self.profile.default_name.clone(),
            bedtime: self.profile.default_bedtime.clone(),
            wakeup_time: self.profile.default_wakeup_time.clone(),
            sleep_goal: self.profile.default_sleep_goal,
        }
    }

    pub fn quality_thresholds(&self) -> QualityThresholds {
        QualityThresholds {
            excellent: self.sleep.excellent_hours,
            good: self.sleep.good_hours,
            fair: self.sleep.fair_hours,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
