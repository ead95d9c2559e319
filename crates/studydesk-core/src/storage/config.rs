//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Completion signal behavior (tone, alert text)
//! - Planner form defaults
//! - Timer tick period
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::planner::DEFAULT_SESSION_MINUTES;
use crate::signal::DEFAULT_ALERT_MESSAGE;

/// Completion signal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub tone_enabled: bool,
    #[serde(default = "default_alert_message")]
    pub alert_message: String,
}

/// Planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Session length used when none is given, in minutes.
    #[serde(default = "default_session_duration")]
    pub default_duration: u32,
}

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_true() -> bool {
    true
}
fn default_alert_message() -> String {
    DEFAULT_ALERT_MESSAGE.into()
}
fn default_session_duration() -> u32 {
    DEFAULT_SESSION_MINUTES
}
fn default_tick_ms() -> u64 {
    1000
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            tone_enabled: true,
            alert_message: default_alert_message(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_duration: default_session_duration(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
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
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
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

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Self::from_toml(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Parse configuration text. Missing sections and keys take defaults.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML for this layout.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
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

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
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
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert!(parsed.notifications.tone_enabled);
        assert_eq!(parsed.planner.default_duration, 60);
        assert_eq!(parsed.timer.tick_ms, 1000);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let cfg = Config::from_toml("[planner]\ndefault_duration = 90\n").unwrap();
        assert_eq!(cfg.planner.default_duration, 90);
        assert_eq!(cfg.timer.tick_ms, 1000);
        assert_eq!(cfg.notifications.alert_message, DEFAULT_ALERT_MESSAGE);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::from_toml("planner = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notifications.tone_enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("planner.default_duration").as_deref(), Some("60"));
        assert!(cfg.get("planner.missing_key").is_none());
        assert!(cfg.get("planner").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("notifications.tone_enabled", "false").unwrap();
        cfg.set("planner.default_duration", "45").unwrap();
        cfg.set("notifications.alert_message", "Done!").unwrap();
        assert!(!cfg.notifications.tone_enabled);
        assert_eq!(cfg.planner.default_duration, 45);
        assert_eq!(cfg.notifications.alert_message, "Done!");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("ui.dark_mode", "true").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
        assert!(matches!(cfg.set("planner", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        let err = cfg.set("notifications.tone_enabled", "loud").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let err = cfg.set("timer.tick_ms", "-5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
