//! TOML-based application configuration.
//!
//! Stores practice preferences:
//! - Transition gap between sequence poses
//! - Default interval workout shape
//! - Audio cue settings
//!
//! Configuration is stored at `~/.config/asanaflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError, Result};
use crate::timer::{Exercise, IntervalConfig, DEFAULT_TRANSITION_GAP_SECS};

/// Sequence timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSettings {
    #[serde(default = "default_transition_gap")]
    pub transition_gap_secs: u64,
}

/// Default shape for interval workouts started without a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalSettings {
    #[serde(default = "default_work")]
    pub work_secs: u64,
    #[serde(default = "default_rest")]
    pub rest_secs: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

/// Audio cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_50")]
    pub volume: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/asanaflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sequence: SequenceSettings,
    #[serde(default)]
    pub interval: IntervalSettings,
    #[serde(default)]
    pub cues: CueConfig,
}

fn default_transition_gap() -> u64 {
    DEFAULT_TRANSITION_GAP_SECS
}
fn default_work() -> u64 {
    20
}
fn default_rest() -> u64 {
    10
}
fn default_rounds() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            transition_gap_secs: default_transition_gap(),
        }
    }
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            work_secs: default_work(),
            rest_secs: default_rest(),
            rounds: default_rounds(),
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 50,
        }
    }
}

/// Returns the config directory, creating it if needed.
///
/// `ASANAFLOW_CONFIG_DIR` wins outright; otherwise `~/.config/asanaflow`,
/// or `~/.config/asanaflow-dev` when `ASANAFLOW_ENV=dev`.
pub fn config_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("ASANAFLOW_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base = dirs::home_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(".config");
            let env = std::env::var("ASANAFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("asanaflow-dev")
            } else {
                base.join("asanaflow")
            }
        }
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |current, part| current.get(part))
    }

    /// Replace a leaf value, parsing `value` according to the existing type.
    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || CoreError::from(ConfigError::UnknownKey(key.to_string()));
        let invalid = |message: String| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            })
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?
                    .into(),
            ),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("only leaf values can be set".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by key in memory. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Interval workout from the configured defaults over `exercises`.
    pub fn interval_config(&self, exercises: Vec<Exercise>) -> IntervalConfig {
        IntervalConfig {
            work_secs: self.interval.work_secs,
            rest_secs: self.interval.rest_secs,
            rounds: self.interval.rounds,
            exercises,
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.sequence.transition_gap_secs, 5);
        assert_eq!(parsed.cues.volume, 50);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[cues]\nenabled = false\n").unwrap();
        assert!(!parsed.cues.enabled);
        assert_eq!(parsed.cues.volume, 50);
        assert_eq!(parsed.interval.rounds, 3);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cues.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("interval.work_secs").as_deref(), Some("20"));
        assert!(cfg.get("cues.missing").is_none());
        assert!(cfg.get("cues").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("sequence.transition_gap_secs", "8").unwrap();
        cfg.set("cues.enabled", "false").unwrap();
        assert_eq!(cfg.sequence.transition_gap_secs, 8);
        assert!(!cfg.cues.enabled);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("cues.pitch", "440").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("cues.enabled", "loud").is_err());
        assert!(cfg.set("interval.rounds", "-1").is_err());
        assert!(cfg.set("interval", "{}").is_err());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.interval.work_secs, 20);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("interval.rounds", "6").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.interval.rounds, 6);
    }

    #[test]
    fn unparsable_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sequence = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn interval_config_uses_defaults() {
        let cfg = Config::default();
        let ic = cfg.interval_config(vec![Exercise::new("A")]);
        assert_eq!(ic.work_secs, 20);
        assert_eq!(ic.rest_secs, 10);
        assert_eq!(ic.rounds, 3);
    }
}
