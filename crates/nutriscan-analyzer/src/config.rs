//! Configuration for the Analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Sampling temperature for every request
    pub temperature: f32,

    /// Token limit for the label analysis
    pub analysis_max_tokens: u32,

    /// Token limit for follow-up answers
    pub chat_max_tokens: u32,

    /// Maximum time for a single LLM call (seconds)
    pub request_timeout_secs: u64,

    /// Maximum OCR text length (characters)
    pub max_text_length: usize,
}

impl AnalyzerConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.analysis_max_tokens == 0 {
            return Err("analysis_max_tokens must be greater than 0".to_string());
        }
        if self.chat_max_tokens == 0 {
            return Err("chat_max_tokens must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            analysis_max_tokens: 1000,
            chat_max_tokens: 500,
            request_timeout_secs: 120,
            max_text_length: 20_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_temperature() {
        let config = AnalyzerConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_token_limits() {
        let mut config = AnalyzerConfig::default();
        config.chat_max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.analysis_max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = AnalyzerConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalyzerConfig::from_toml("chat_max_tokens = 250").unwrap();
        assert_eq!(config.chat_max_tokens, 250);
        assert_eq!(config.analysis_max_tokens, 1000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyzerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_bad_toml() {
        assert!(AnalyzerConfig::from_toml("temperature = \"hot\"").is_err());
    }
}
