//! TOML-based application configuration.
//!
//! Only defaults live here: placeholder titles, default date offsets, the
//! LLM endpoint settings and the timer presets. Everything a user types
//! into an app stays in its session and is never written back.
//!
//! Configuration is stored at `~/.config/dayboard/config.toml`. A missing
//! file is the same as an all-default one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::data_dir;
use crate::error::ConfigError;

/// Bound on configured default offsets, about a century either way.
pub const MAX_OFFSET_DAYS: i64 = 36_525;

/// Single-target D-day calculator defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default = "default_calculator_title")]
    pub default_title: String,
    /// Default target is today plus this many days.
    #[serde(default = "default_calculator_offset")]
    pub default_offset_days: i64,
}

/// D-day list manager defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_item_title")]
    pub default_title: String,
    #[serde(default = "default_item_offset")]
    pub default_offset_days: i64,
    #[serde(default = "default_columns")]
    pub columns: usize,
}

/// Chat-completions endpoint used by the prompt generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Durations offered as start buttons, in minutes.
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayboard/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

// Default functions
fn default_calculator_title() -> String {
    "Set your D-day goal".into()
}
fn default_calculator_offset() -> i64 {
    30
}
fn default_item_title() -> String {
    "New D-day".into()
}
fn default_item_offset() -> i64 {
    7
}
fn default_columns() -> usize {
    3
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    300
}
fn default_presets() -> Vec<u32> {
    vec![3, 5, 10, 15]
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_title: default_calculator_title(),
            default_offset_days: default_calculator_offset(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_title: default_item_title(),
            default_offset_days: default_item_offset(),
            columns: default_columns(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            tick_interval_ms: default_tick_interval_ms(),
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

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<i64>() {
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
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, days) in [
            ("calculator.default_offset_days", self.calculator.default_offset_days),
            ("list.default_offset_days", self.list.default_offset_days),
        ] {
            if !(-MAX_OFFSET_DAYS..=MAX_OFFSET_DAYS).contains(&days) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("must be within +/-{MAX_OFFSET_DAYS} days"),
                });
            }
        }
        if self.list.columns == 0 {
            return Err(ConfigError::InvalidValue {
                key: "list.columns".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.timer.presets.iter().any(|&m| m == 0) {
            return Err(ConfigError::InvalidValue {
                key: "timer.presets".into(),
                message: "durations must be at least one minute".into(),
            });
        }
        if url::Url::parse(&self.prompt.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "prompt.base_url".into(),
                message: format!("'{}' is not a valid URL", self.prompt.base_url),
            });
        }
        Ok(())
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
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.timer.presets, vec![3, 5, 10, 15]);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[prompt]\nmodel = \"local-model\"\n").unwrap();
        assert_eq!(parsed.prompt.model, "local-model");
        assert_eq!(parsed.prompt.max_tokens, 300);
        assert_eq!(parsed.calculator.default_offset_days, 30);
    }

    #[test]
    fn get_by_dot_path() {
        let cfg = Config::default();
        assert_eq!(cfg.get("list.columns").as_deref(), Some("3"));
        assert_eq!(cfg.get("calculator.default_title").as_deref(), Some("Set your D-day goal"));
        assert_eq!(cfg.get("nope.nothing"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_by_dot_path() {
        let mut cfg = Config::default();
        cfg.set("prompt.temperature", "0.2").unwrap();
        cfg.set("timer.presets", "[1, 2]").unwrap();
        cfg.set("list.default_title", "Trip").unwrap();
        assert!((cfg.prompt.temperature - 0.2).abs() < 1e-6);
        assert_eq!(cfg.timer.presets, vec![1, 2]);
        assert_eq!(cfg.list.default_title, "Trip");
    }

    #[test]
    fn set_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("list.rows", "2"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("list.columns", "many"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("list.columns", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("calculator.default_offset_days", "100000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("list.default_offset_days", "-36526"),
            Err(ConfigError::InvalidValue { .. })
        ));
        cfg.set("list.default_offset_days", "-36525").unwrap();
        assert_eq!(cfg.list.columns, 3);
        assert_eq!(cfg.calculator.default_offset_days, 30);
        assert_eq!(cfg.list.default_offset_days, -36525);
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.set("timer.tick_interval_ms", "250").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.tick_interval_ms, 250);
    }

    #[test]
    fn out_of_range_offset_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calculator]\ndefault_offset_days = 100000000\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "calculator = 5").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::LoadFailed { .. })));
    }
}
