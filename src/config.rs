//! Configuration management for logofinder
//!
//! Configuration is read from `./config/logofinder.toml` (or the path given with
//! `--config`). When no file exists the embedded template is used, so the tool
//! works out of the box; `--init` writes that template to disk for editing.

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/logofinder.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/logofinder.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Configuration field '{field}' must be greater than zero")]
    ZeroValue { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub precheck: PrecheckConfig,
    pub strategies: StrategiesConfig,
    #[serde(default)]
    pub detectors: DetectorsConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Settings shared by every outgoing request
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub browser_user_agent: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_max_redirects() -> usize {
    10
}

/// Connectivity precheck settings
#[derive(Debug, Clone, Deserialize)]
pub struct PrecheckConfig {
    pub timeout_secs: u64,
}

impl PrecheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategiesConfig {
    pub browser: BrowserStrategyConfig,
    pub headerless: HeaderlessStrategyConfig,
}

/// Timeouts for the browser-simulation fetch strategy
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserStrategyConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

/// Timeouts for the headerless fallback fetch strategy
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderlessStrategyConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    #[serde(default = "default_error_preview_chars")]
    pub error_preview_chars: usize,
}

fn default_error_preview_chars() -> usize {
    500
}

/// Text form used when embedding an inline SVG logo into a `data:` URL
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SvgEncoding {
    /// `data:image/svg+xml,<percent-encoded markup>`
    #[default]
    Percent,
    /// `data:image/svg+xml;base64,<base64 markup>`
    Base64,
}

impl std::str::FromStr for SvgEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percent" => Ok(SvgEncoding::Percent),
            "base64" => Ok(SvgEncoding::Base64),
            other => Err(format!("unknown SVG encoding '{}' (expected 'percent' or 'base64')", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DetectorsConfig {
    #[serde(default)]
    pub svg_encoding: SvgEncoding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_parallel")]
    pub parallel: usize,
}

fn default_parallel() -> usize {
    4
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded default configuration
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Load an explicit path (which must exist), else the default path if it
    /// exists, else the embedded defaults.
    pub fn load_or_embedded(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::load() {
                Err(ConfigError::FileNotFound(_)) => Self::embedded(),
                other => other,
            },
        }
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.browser_user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.browser_user_agent".to_string(),
            });
        }

        let durations = [
            ("precheck.timeout_secs", self.precheck.timeout_secs),
            ("strategies.browser.connect_timeout_secs", self.strategies.browser.connect_timeout_secs),
            ("strategies.browser.timeout_secs", self.strategies.browser.timeout_secs),
            ("strategies.headerless.connect_timeout_secs", self.strategies.headerless.connect_timeout_secs),
            ("strategies.headerless.read_timeout_secs", self.strategies.headerless.read_timeout_secs),
        ];
        // Every network operation needs a bounded timeout
        for (field, value) in durations {
            if value == 0 {
                return Err(ConfigError::ZeroValue { field: field.to_string() });
            }
        }

        if self.batch.parallel == 0 {
            return Err(ConfigError::ZeroValue {
                field: "batch.parallel".to_string(),
            });
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        Self::create_default_config_at(Path::new(CONFIG_PATH))
    }

    pub fn create_default_config_at(path: &Path) -> Result<PathBuf, ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config: Result<AppConfig, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok(), "Default config should parse: {:?}", config.err());
    }

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::embedded().unwrap();
        assert_eq!(config.precheck.timeout_secs, 10);
        assert_eq!(config.strategies.browser.connect_timeout_secs, 5);
        assert_eq!(config.strategies.browser.timeout_secs, 10);
        assert_eq!(config.strategies.headerless.read_timeout_secs, 15);
        assert_eq!(config.detectors.svg_encoding, SvgEncoding::Percent);
    }

    #[test]
    fn test_optional_sections_use_defaults() {
        let config_str = r#"
[http]
browser_user_agent = "test/1.0"

[precheck]
timeout_secs = 3

[strategies.browser]
connect_timeout_secs = 1
timeout_secs = 2

[strategies.headerless]
connect_timeout_secs = 1
read_timeout_secs = 2
"#;

        let config = AppConfig::from_toml(config_str).expect("Config should parse without optional sections");
        assert_eq!(config.http.max_redirects, 10);
        assert_eq!(config.strategies.headerless.error_preview_chars, 500);
        assert_eq!(config.detectors.svg_encoding, SvgEncoding::Percent);
        assert_eq!(config.batch.parallel, 4);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config_str = DEFAULT_CONFIG.replace("read_timeout_secs = 15", "read_timeout_secs = 0");
        match AppConfig::from_toml(&config_str) {
            Err(ConfigError::ZeroValue { field }) => {
                assert_eq!(field, "strategies.headerless.read_timeout_secs");
            }
            other => panic!("expected ZeroValue error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let config_str = DEFAULT_CONFIG.replace(
            "browser_user_agent = \"Mozilla/5.0",
            "browser_user_agent = \"   \"\n# \"Mozilla/5.0",
        );
        assert!(matches!(
            AppConfig::from_toml(&config_str),
            Err(ConfigError::EmptyRequired { .. })
        ));
    }

    #[test]
    fn test_svg_encoding_from_str() {
        assert_eq!("base64".parse::<SvgEncoding>().unwrap(), SvgEncoding::Base64);
        assert_eq!("PERCENT".parse::<SvgEncoding>().unwrap(), SvgEncoding::Percent);
        assert!("hex".parse::<SvgEncoding>().is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load_or_embedded(Some(&missing)),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_create_default_config_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config").join("logofinder.toml");
        AppConfig::create_default_config_at(&path).unwrap();
        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.batch.parallel, 4);
    }
}
