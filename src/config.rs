//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub log_panel: LogPanelConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Train counter server location
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL all endpoints are joined onto (scheme + host + port)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Live event stream settings
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_stream_path")]
    pub path: String,

    /// Reconnect after the stream drops
    #[serde(default = "default_reconnect")]
    pub reconnect: bool,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// 0 means retry forever
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_stream_path() -> String {
    "/ws".to_string()
}

fn default_reconnect() -> bool {
    true
}

fn default_initial_backoff() -> u64 {
    1000 // 1 second
}

fn default_max_backoff() -> u64 {
    30000 // 30 seconds
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            path: default_stream_path(),
            reconnect: default_reconnect(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

/// Operator log panel settings
#[derive(Debug, Clone, Deserialize)]
pub struct LogPanelConfig {
    /// Entries kept before the oldest is evicted; 0 keeps everything
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
}

fn default_log_capacity() -> usize {
    crate::event_log::EventLog::DEFAULT_CAPACITY
}

impl Default for LogPanelConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("railcount").join("config.toml")),
            Some(PathBuf::from("./railcount.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RAILCOUNT_BASE_URL") {
            self.server.base_url = url;
        }

        if let Ok(capacity) = std::env::var("RAILCOUNT_LOG_CAPACITY") {
            if let Ok(c) = capacity.parse() {
                self.log_panel.capacity = c;
            }
        }

        if let Ok(level) = std::env::var("RAILCOUNT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RAILCOUNT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Railcount Dashboard Configuration
#
# Environment variables override these settings:
# - RAILCOUNT_BASE_URL
# - RAILCOUNT_LOG_CAPACITY
# - RAILCOUNT_LOG_LEVEL
# - RAILCOUNT_LOG_FORMAT

[server]
# Train counter server (the /api and /ws endpoints live here)
base_url = "http://localhost:8000"

# Timeout for summary requests in seconds
request_timeout_secs = 10

[stream]
# Event stream path on the server
path = "/ws"

# Reconnect when the stream drops
reconnect = true

# Delay before the first reconnect; doubles per attempt (ms)
initial_backoff_ms = 1000

# Upper bound on the reconnect delay (ms)
max_backoff_ms = 30000

# Give up after this many consecutive failed attempts (0 = never)
max_reconnect_attempts = 5

[log_panel]
# Stream frames kept in the log panel (0 = unbounded)
capacity = 200

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
