//! Configuration for extraction

use std::time::Duration;

use serde::{Deserialize, Serialize};
use waybill_domain::GenerationOptions;

use crate::error::ExtractorError;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Try the model before falling back to patterns
    pub use_model: bool,

    /// Characters of cleaned text embedded in the prompt
    pub prefix_chars: usize,

    /// Wall-clock budget for one model request (milliseconds)
    pub request_timeout_ms: u64,

    /// Maximum simultaneous in-flight model requests
    pub max_concurrent_requests: usize,

    /// How far (characters) a name may sit from the address it belongs to
    pub name_window_chars: usize,

    /// How far (tokens) a tracking number may sit from its pair
    pub tracking_window_tokens: usize,

    /// Generation parameters sent with every request
    pub generation: GenerationOptions,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Override the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Pattern extraction only
    pub fn rules_only() -> Self {
        Self {
            use_model: false,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.prefix_chars == 0 {
            return Err(ExtractorError::Config("prefix_chars must be greater than 0".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ExtractorError::Config(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ExtractorError::Config(
                "max_concurrent_requests must be greater than 0".to_string(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(ExtractorError::Config("max_tokens must be greater than 0".to_string()));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ExtractorError::Config("temperature must be within [0, 2]".to_string()));
        }
        if !(0.0..=1.0).contains(&self.generation.top_p) {
            return Err(ExtractorError::Config("top_p must be within [0, 1]".to_string()));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            use_model: true,
            prefix_chars: 300,
            request_timeout_ms: 8_000,
            max_concurrent_requests: 4,
            name_window_chars: 120,
            tracking_window_tokens: 12,
            generation: GenerationOptions::default(),
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: shorter prompt and deadline for faster batches
    pub fn aggressive() -> Self {
        Self {
            prefix_chars: 200,
            request_timeout_ms: 4_000,
            generation: GenerationOptions {
                max_tokens: 96,
                ..GenerationOptions::default()
            },
            ..Self::default()
        }
    }

    /// Lenient preset: longer prompt and deadline for slower hardware
    pub fn lenient() -> Self {
        Self {
            prefix_chars: 600,
            request_timeout_ms: 15_000,
            max_concurrent_requests: 2,
            generation: GenerationOptions {
                max_tokens: 200,
                context_window: 2048,
                ..GenerationOptions::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(8));
        assert_eq!(config.prefix_chars, 300);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
        assert!(!ExtractorConfig::rules_only().use_model);
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ExtractorConfig {
            request_timeout_ms: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_top_p() {
        let mut config = ExtractorConfig::default();
        config.generation.top_p = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_request_timeout() {
        let config = ExtractorConfig::default().with_request_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout_ms, 250);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml() {
        let parsed = ExtractorConfig::from_toml("prefix_chars = 120\n[generation]\nmax_tokens = 64\n").unwrap();
        assert_eq!(parsed.prefix_chars, 120);
        assert_eq!(parsed.generation.max_tokens, 64);
        assert_eq!(parsed.generation.top_k, 30);
        assert!(parsed.use_model);
    }
}
