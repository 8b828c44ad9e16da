//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use nutriscan_analyzer::AnalyzerConfig;
use nutriscan_llm::perplexity::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Perplexity API settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Analysis request settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Text recognition settings
    #[serde(default)]
    pub ocr: OcrSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Perplexity API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (PERPLEXITY_API_KEY or --api-key take precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// HTTP timeout per attempt (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Text recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract executable
    #[serde(default = "default_ocr_binary")]
    pub binary: String,

    /// Tesseract language code
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Color theme
    #[serde(default = "default_theme")]
    pub theme: Theme,

    /// Chat history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background
    Light,
    /// Light text on a dark background
    Dark,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".nutriscan").join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section for values the CLI cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.analyzer.validate().map_err(CliError::Config)?;
        if self.api.endpoint.trim().is_empty() {
            return Err(CliError::Config("api.endpoint must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(CliError::Config("api.timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    /// Pick the API key: the command line (or environment) first, then the file.
    pub fn resolve_api_key(&self, cli_key: Option<String>) -> Result<String> {
        cli_key
            .into_iter()
            .chain(self.api.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or_else(|| CliError::Config("Perplexity API key is not configured".into()))
    }

    /// File holding the follow-up chat history, next to the config file.
    pub fn history_path(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(|dir| dir.join("chat_history.txt"))
            .unwrap_or_else(|| PathBuf::from("chat_history.txt"))
    }

    /// Copy of the configuration that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api.api_key.is_some() {
            config.api.api_key = Some("********".to_string());
        }
        config
    }
}

impl ApiSettings {
    /// HTTP timeout per attempt.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            binary: default_ocr_binary(),
            language: default_ocr_language(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            theme: Theme::Light,
            history_size: 1000,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_ocr_binary() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_theme() -> Theme {
    Theme::Light
}

fn default_history_size() -> usize {
    1000
}
