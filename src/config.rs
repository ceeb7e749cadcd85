//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat endpoint and cosmetic timing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,

    #[serde(default = "default_thinking_interval")]
    pub thinking_interval_ms: u64,

    #[serde(default = "default_reply_pause")]
    pub reply_pause_ms: u64,

    #[serde(default = "default_reply_pause_jitter")]
    pub reply_pause_jitter_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8050".to_string()
}

fn default_endpoint() -> String {
    "/api/chat".to_string()
}

fn default_model() -> String {
    "qwen2.5vl:72b".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_typing_delay() -> u64 {
    20
}

fn default_thinking_interval() -> u64 {
    400
}

fn default_reply_pause() -> u64 {
    500
}

fn default_reply_pause_jitter() -> u64 {
    800
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            model: default_model(),
            request_timeout_secs: default_request_timeout(),
            typing_delay_ms: default_typing_delay(),
            thinking_interval_ms: default_thinking_interval(),
            reply_pause_ms: default_reply_pause(),
            reply_pause_jitter_ms: default_reply_pause_jitter(),
        }
    }
}

impl ChatConfig {
    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.endpoint)
    }

    /// Full URL of a sibling route on the same backend (e.g. `/api/reset_chat`)
    pub fn route_url(&self, route: &str) -> String {
        join_url(&self.base_url, route)
    }

    /// Pause between a delivered reply and its typing reveal.
    ///
    /// `jitter_fraction` is a random number in `0.0..1.0` picked by the caller.
    pub fn reply_pause(&self, jitter_fraction: f64) -> std::time::Duration {
        let jitter = (self.reply_pause_jitter_ms as f64 * jitter_fraction.clamp(0.0, 1.0)) as u64;
        std::time::Duration::from_millis(self.reply_pause_ms + jitter)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Dataset browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_csv_url")]
    pub csv_url: String,
}

/// Published export of the lab's dataset sheet
pub const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vS6BxRrR8H56sDOg9LZA8WGVrQlbVg6vRMxtWgqG1Yo4W3IwgWHS7n6ajB4FNIKyHRwqZXjF9w7hdiN/pub?gid=0&single=true&output=csv";

fn default_csv_url() -> String {
    DEFAULT_CSV_URL.to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            csv_url: default_csv_url(),
        }
    }
}

/// Image viewer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_image_url")]
    pub image_url: String,

    #[serde(default = "default_image_extent")]
    pub width: f64,

    #[serde(default = "default_image_extent")]
    pub height: f64,

    /// Zoom exponents, base 2
    #[serde(default = "default_min_zoom")]
    pub min_zoom: i32,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: i32,
}

fn default_image_url() -> String {
    "https://upload.wikimedia.org/wikipedia/commons/3/3c/Shaki_waterfall.jpg".to_string()
}

fn default_image_extent() -> f64 {
    2000.0
}

fn default_min_zoom() -> i32 {
    -4
}

fn default_max_zoom() -> i32 {
    4
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            image_url: default_image_url(),
            width: default_image_extent(),
            height: default_image_extent(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
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

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    #[cfg(feature = "native")]
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("labscope").join("config.toml")),
            Some(PathBuf::from("/etc/labscope/config.toml")),
            Some(PathBuf::from("./labscope.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("LABSCOPE_CHAT_URL") {
            self.chat.base_url = url;
        }
        if let Ok(model) = std::env::var("LABSCOPE_CHAT_MODEL") {
            self.chat.model = model;
        }

        if let Ok(url) = std::env::var("LABSCOPE_CSV_URL") {
            self.dataset.csv_url = url;
        }

        if let Ok(level) = std::env::var("LABSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LABSCOPE_LOG_FORMAT") {
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
    format!(
        r#"# Labscope Configuration
#
# Environment variables override these settings:
# - LABSCOPE_CHAT_URL
# - LABSCOPE_CHAT_MODEL
# - LABSCOPE_CSV_URL
# - LABSCOPE_LOG_LEVEL
# - LABSCOPE_LOG_FORMAT

[chat]
# Backend that proxies the vision model
base_url = "http://localhost:8050"
endpoint = "/api/chat"
model = "qwen2.5vl:72b"
request_timeout_secs = 120

# Cosmetic effects (milliseconds)
typing_delay_ms = 20
thinking_interval_ms = 400
reply_pause_ms = 500
reply_pause_jitter_ms = 800

[dataset]
# Published CSV export of the dataset sheet
csv_url = "{}"

[viewer]
image_url = "https://upload.wikimedia.org/wikipedia/commons/3/3c/Shaki_waterfall.jpg"
width = 2000.0
height = 2000.0
# Zoom limits as powers of two
min_zoom = -4
max_zoom = 4

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        DEFAULT_CSV_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chat.model, "qwen2.5vl:72b");
        assert_eq!(config.chat.chat_url(), "http://localhost:8050/api/chat");
        assert_eq!(config.chat.thinking_interval_ms, 400);
        assert_eq!(config.viewer.min_zoom, -4);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[chat]
base_url = "http://tunnel:9000/"
model = "llava"
"#,
        )
        .unwrap();

        assert_eq!(config.chat.chat_url(), "http://tunnel:9000/api/chat");
        assert_eq!(config.chat.model, "llava");
        assert_eq!(config.chat.typing_delay_ms, 20);
        assert_eq!(config.dataset.csv_url, DEFAULT_CSV_URL);
    }

    #[test]
    fn test_absolute_endpoint_wins() {
        let chat = ChatConfig {
            endpoint: "https://proxy.example/chat".to_string(),
            ..ChatConfig::default()
        };
        assert_eq!(chat.chat_url(), "https://proxy.example/chat");
        assert_eq!(
            chat.route_url("/api/reset_chat"),
            "http://localhost:8050/api/reset_chat"
        );
    }

    #[test]
    fn test_reply_pause_range() {
        let chat = ChatConfig::default();
        assert_eq!(chat.reply_pause(0.0).as_millis(), 500);
        assert_eq!(chat.reply_pause(0.5).as_millis(), 900);
        assert_eq!(chat.reply_pause(7.0).as_millis(), 1300);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::from_toml_str(&generate_default_config()).unwrap();
        assert_eq!(config.viewer.width, 2000.0);
        assert_eq!(config.dataset.csv_url, DEFAULT_CSV_URL);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labscope.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");

        let missing = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[chat\n").unwrap();

        match Config::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
