//! Directory configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Collection URL baked in at build time, overridable at runtime.
const BUILD_API_URL: Option<&str> = option_env!("USER_DIRECTORY_API_URL");
const FALLBACK_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Directory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the remote user collection
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Capacity of the directory actor's mailbox
    #[serde(default = "default_mailbox_size")]
    pub mailbox_size: usize,

    /// Directory for the log file; `None` logs to stderr
    #[serde(default = "default_log_dir")]
    pub log_dir: Option<PathBuf>,
}

fn default_api_url() -> String {
    BUILD_API_URL.unwrap_or(FALLBACK_API_URL).to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mailbox_size() -> usize {
    32
}

fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("user-directory"))
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            log_level: default_log_level(),
            mailbox_size: default_mailbox_size(),
            log_dir: default_log_dir(),
        }
    }
}

impl DirectoryConfig {
    /// Load configuration: defaults, then the config file if one exists, then
    /// environment variables (a `.env` file is honored).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match Self::find_config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Override fields from `USER_DIRECTORY_*` variables looked up through `var`.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = var("USER_DIRECTORY_API_URL") {
            self.api_url = url;
        }

        if let Some(level) = var("USER_DIRECTORY_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(size) = var("USER_DIRECTORY_MAILBOX_SIZE") {
            self.mailbox_size = size
                .parse()
                .map_err(|_| ConfigError::InvalidValue("USER_DIRECTORY_MAILBOX_SIZE", size))?;
        }

        // An empty value sends logs to stderr.
        if let Some(dir) = var("USER_DIRECTORY_LOG_DIR") {
            self.log_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }

        if self.mailbox_size == 0 {
            return Err(ConfigError::InvalidValue("mailbox_size", "0".to_string()));
        }

        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut locations = vec![PathBuf::from("user-directory.toml")];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join("user-directory").join("config.toml"));
        }

        locations.into_iter().find(|p| p.exists())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
