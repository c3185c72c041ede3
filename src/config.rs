//! Configuration loading and management
//!
//! Handles parsing of `taskflow.toml`, looked up in the data directory unless
//! a path is given explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::{default_seeds, CategorySeed, DEFAULT_EMOJI};
use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::query::SortMode;

/// Name of the config file inside the data directory
pub const CONFIG_FILE: &str = "taskflow.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Credential rules
    #[serde(default)]
    pub auth: AuthConfig,

    /// Category defaults
    #[serde(default)]
    pub categories: CategoriesConfig,

    /// Task listing defaults
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Record store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Credential rules applied at sign-in and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum username length, counted after trimming
    #[serde(default = "default_min_username_len")]
    pub min_username_len: usize,

    /// Minimum password length
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_min_username_len() -> usize {
    3
}

fn default_min_password_len() -> usize {
    4
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_username_len: default_min_username_len(),
            min_password_len: default_min_password_len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    /// Emoji for categories created without one
    #[serde(default = "default_category_emoji")]
    pub default_emoji: String,

    /// Categories installed for a freshly registered account
    #[serde(default = "default_seeds")]
    pub defaults: Vec<CategorySeed>,
}

fn default_category_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            default_emoji: default_category_emoji(),
            defaults: default_seeds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TasksConfig {
    /// Sort order used when none is requested
    #[serde(default)]
    pub default_sort: SortMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long a write waits for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `taskflow.toml` from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "using default config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.auth.min_username_len == 0 {
            return Err(Error::InvalidConfig(
                "auth.min_username_len must be >= 1".to_string(),
            ));
        }
        if self.auth.min_password_len == 0 {
            return Err(Error::InvalidConfig(
                "auth.min_password_len must be >= 1".to_string(),
            ));
        }
        if self.categories.default_emoji.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "categories.default_emoji cannot be empty".to_string(),
            ));
        }
        for seed in &self.categories.defaults {
            if seed.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "categories.defaults cannot include empty names".to_string(),
                ));
            }
        }
        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform data directory for taskflow, e.g. `~/.local/share/taskflow`.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "taskflow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".taskflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.auth.min_username_len, 3);
        assert_eq!(cfg.auth.min_password_len, 4);
        assert_eq!(cfg.categories.default_emoji, "📁");
        assert_eq!(cfg.categories.defaults.len(), 3);
        assert_eq!(cfg.categories.defaults[0].name, "Personal");
        assert_eq!(cfg.tasks.default_sort, SortMode::Newest);
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[auth]
min_username_len = 5
min_password_len = 8

[categories]
default_emoji = "📝"
defaults = [{ name = "شخصی", emoji = "🏠" }, { name = "کار", emoji = "💼" }]

[tasks]
default_sort = "pending"

[storage]
lock_timeout_ms = 250
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.auth.min_username_len, 5);
        assert_eq!(cfg.auth.min_password_len, 8);
        assert_eq!(cfg.categories.default_emoji, "📝");
        assert_eq!(
            cfg.categories.defaults,
            vec![CategorySeed::new("شخصی", "🏠"), CategorySeed::new("کار", "💼")]
        );
        assert_eq!(cfg.tasks.default_sort, SortMode::PendingFirst);
        assert_eq!(cfg.storage.lock_timeout_ms, 250);
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[auth]\nmin_password_len = 0\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tasks]\ndefault_sort = \"priority\"\n").expect("write config");

        assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
    }

    #[test]
    fn load_from_dir_defaults_when_missing_or_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(Config::load_from_dir(dir.path()).auth.min_username_len, 3);

        fs::write(dir.path().join(CONFIG_FILE), "this = [not valid").expect("write config");
        assert_eq!(Config::load_from_dir(dir.path()).auth.min_username_len, 3);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("min_username_len = 3"));
        assert!(written.contains("default_sort = \"newest\""));
    }
}
