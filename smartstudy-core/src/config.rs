//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": {
//!     "keyPrefix": "smartstudy",
//!     "autoLoginAfterRegister": true,
//!     "autoLoginDelayMs": 1000,
//!     "validateSessionOnRestore": true
//!   }
//! }
//! ```
//! Fields this crate doesn't know about are kept when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::StorageKeys;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_key_prefix")]
    key_prefix: String,
    #[serde(default = "default_true")]
    auto_login_after_register: bool,
    #[serde(default = "default_auto_login_delay_ms")]
    auto_login_delay_ms: u64,
    #[serde(default = "default_true")]
    validate_session_on_restore: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            auto_login_after_register: true,
            auto_login_delay_ms: default_auto_login_delay_ms(),
            validate_session_on_restore: true,
            other: HashMap::new(),
        }
    }
}

fn default_key_prefix() -> String {
    "smartstudy".to_string()
}

fn default_true() -> bool {
    true
}

fn default_auto_login_delay_ms() -> u64 {
    1000
}

/// Settings that `Config::set` accepts
pub const SETTING_NAMES: &[&str] = &[
    "keyPrefix",
    "autoLoginAfterRegister",
    "autoLoginDelayMs",
    "validateSessionOnRestore",
];

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => bail!("{} must be true or false", key),
    }
}

/// Parse a boolean environment override
fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

/// SmartStudy configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub key_prefix: String,
    pub auto_login_after_register: bool,
    pub auto_login_delay_ms: u64,
    pub validate_session_on_restore: bool,
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_raw(SettingsFile::default())
    }
}

impl Config {
    fn from_raw(raw: SettingsFile) -> Self {
        Self {
            key_prefix: raw.app.key_prefix.clone(),
            auto_login_after_register: raw.app.auto_login_after_register,
            auto_login_delay_ms: raw.app.auto_login_delay_ms,
            validate_session_on_restore: raw.app.validate_session_on_restore,
            _raw_settings: raw,
        }
    }

    /// Load config from the data directory
    ///
    /// A missing or unparsable settings file gives the defaults. Environment
    /// override (for CI/testing): SMARTSTUDY_VALIDATE_SESSION.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let mut config = Self::from_raw(raw);
        if let Some(validate) = env_flag("SMARTSTUDY_VALIDATE_SESSION") {
            config.validate_session_on_restore = validate;
        }
        Ok(config)
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.app.key_prefix = self.key_prefix.clone();
        settings.app.auto_login_after_register = self.auto_login_after_register;
        settings.app.auto_login_delay_ms = self.auto_login_delay_ms;
        settings.app.validate_session_on_restore = self.validate_session_on_restore;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Set one setting by its settings.json name
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "keyPrefix" => {
                let prefix = value.trim();
                if prefix.is_empty() {
                    bail!("keyPrefix cannot be empty");
                }
                self.key_prefix = prefix.to_string();
            }
            "autoLoginAfterRegister" => self.auto_login_after_register = parse_bool(key, value)?,
            "autoLoginDelayMs" => {
                self.auto_login_delay_ms = value
                    .parse()
                    .with_context(|| format!("{} must be a whole number of milliseconds", key))?;
            }
            "validateSessionOnRestore" => {
                self.validate_session_on_restore = parse_bool(key, value)?
            }
            _ => bail!(
                "Unknown setting '{}'. Known settings: {}",
                key,
                SETTING_NAMES.join(", ")
            ),
        }
        Ok(())
    }

    /// Current values by settings.json name
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("keyPrefix", self.key_prefix.clone()),
            ("autoLoginAfterRegister", self.auto_login_after_register.to_string()),
            ("autoLoginDelayMs", self.auto_login_delay_ms.to_string()),
            ("validateSessionOnRestore", self.validate_session_on_restore.to_string()),
        ]
    }

    /// Store keys derived from the configured prefix
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.key_prefix, "smartstudy");
        assert!(config.auto_login_after_register);
        assert_eq!(config.auto_login_delay_ms, 1000);
        assert_eq!(config.storage_keys().users, "smartstudy_users");
    }

    #[test]
    fn test_partial_file_and_preserved_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"keyPrefix": "study", "theme": "dark"}, "extra": 1}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.key_prefix, "study");
        assert_eq!(config.auto_login_delay_ms, 1000);
        assert_eq!(config.storage_keys().notes, "study_notes");

        config.auto_login_delay_ms = 0;
        config.save(dir.path()).unwrap();

        let saved = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["app"]["theme"], "dark");
        assert_eq!(value["extra"], 1);
        assert_eq!(value["app"]["autoLoginDelayMs"], 0);
    }

    #[test]
    fn test_garbage_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.key_prefix, "smartstudy");
    }

    #[test]
    fn test_set_and_save_round_trip() {
        let dir = tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();

        config.set("autoLoginDelayMs", "250").unwrap();
        config.set("autoLoginAfterRegister", "false").unwrap();
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.auto_login_delay_ms, 250);
        assert!(!reloaded.auto_login_after_register);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("theme", "dark").is_err());
        assert!(config.set("autoLoginDelayMs", "soon").is_err());
        assert!(config.set("validateSessionOnRestore", "maybe").is_err());
        assert!(config.set("keyPrefix", "  ").is_err());
        assert_eq!(config.auto_login_delay_ms, 1000);
        assert_eq!(config.key_prefix, "smartstudy");
    }
}
