//! Application constants and the optional `config.toml` file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Application name
pub const APP_NAME: &str = "astralis";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database filename inside the data directory
pub const DATABASE_FILE: &str = "astralis.db";

/// Configuration filename inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

// ============================================================================
// Storage keys
// ============================================================================

/// Catalog slice (categories and their links)
pub const STORAGE_KEY_DATA: &str = "astralis_data";

/// Search engine slice
pub const STORAGE_KEY_ENGINES: &str = "astralis_engines";

/// Settings slice
pub const STORAGE_KEY_SETTINGS: &str = "astralis_settings";

// ============================================================================
// Search
// ============================================================================

/// Placeholder replaced by the escaped query in engine URL templates
pub const QUERY_PLACEHOLDER: &str = "%s";

/// Icon given to engines added without one
pub const DEFAULT_ENGINE_ICON: &str = "🔍";

/// Prefix for ids of user-added engines
pub const CUSTOM_ENGINE_PREFIX: &str = "custom-";

/// Suggestion endpoint (OpenSearch suggestion format)
/// Use {} as placeholder for the search query
pub const SUGGESTIONS_URL: &str = "https://duckduckgo.com/ac/?q={}&type=list";

/// Maximum search suggestion results
pub const SEARCH_SUGGESTIONS_LIMIT: usize = 6;

// ============================================================================
// Favicons
// ============================================================================

/// Favicon service, {} is replaced by the link host
pub const FAVICON_SERVICE_URL: &str = "https://ico.faviconkit.net/favicon/{}?sz=128";

// ============================================================================
// Backup
// ============================================================================

/// Backup filename prefix, followed by the date and `.json`
pub const BACKUP_FILE_PREFIX: &str = "astralis_backup_";

/// Error type for reading the configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Toml(e) => write!(f, "Invalid config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

/// Runtime configuration read from `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the database; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Locale used instead of the environment (e.g. "zh_CN")
    pub locale: Option<String>,
    /// Whether to query the suggestion service
    pub suggestions: bool,
    pub suggestion_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            locale: None,
            suggestions: true,
            suggestion_limit: SEARCH_SUGGESTIONS_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load the configuration from the platform config directory.
    /// A missing or malformed file yields the defaults.
    pub fn load() -> Self {
        let Some(dirs) = project_dirs() else {
            log::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        let path = dirs.config_dir().join(CONFIG_FILE);
        match Self::from_file(&path) {
            Ok(Some(config)) => {
                log::info!("Loaded configuration from {:?}", path);
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring configuration at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Read a configuration file; `None` if it does not exist
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(Self::from_toml_str(&contents)?))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Directory where the database lives
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                // Fallback to ~/.local/share/astralis
                std::env::var_os("HOME")
                    .map(|home| PathBuf::from(home).join(".local/share"))
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_NAME)
            })
    }

    /// Full path of the database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE)
    }

    /// Locale hint: the configured override, else the environment
    pub fn locale_hint(&self) -> String {
        self.locale.clone().unwrap_or_else(environment_locale)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "astralis", "astralis")
}

/// Locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, first non-empty wins
pub fn environment_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.suggestions);
        assert_eq!(config.suggestion_limit, SEARCH_SUGGESTIONS_LIMIT);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml_str(
            r#"
            data_dir = "/tmp/astralis"
            locale = "zh_CN.UTF-8"
            suggestions = false
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/astralis")));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/astralis").join(DATABASE_FILE));
        assert_eq!(config.locale_hint(), "zh_CN.UTF-8");
        assert!(!config.suggestions);
        assert_eq!(config.suggestion_limit, SEARCH_SUGGESTIONS_LIMIT);
    }

    #[test]
    fn test_malformed_config() {
        assert!(AppConfig::from_toml_str("suggestions = \"maybe\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::from_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert!(result.is_none());
    }
}
