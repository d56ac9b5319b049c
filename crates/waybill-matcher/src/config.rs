//! Matcher configuration

use serde::{Deserialize, Serialize};

use crate::MatcherError;

/// Scoring weights and tier boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Combined score at or above which a match is confirmed (0-100)
    pub threshold: f64,

    /// Width of the review band directly below the threshold
    pub review_margin: f64,

    /// Weight of the name score in the combined score
    pub name_weight: f64,

    /// Weight of the address score in the combined score
    pub address_weight: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 70.0,
            review_margin: 10.0,
            name_weight: 0.6,
            address_weight: 0.4,
        }
    }
}

impl MatcherConfig {
    /// Strict preset: higher threshold, narrower review band
    pub fn strict() -> Self {
        Self {
            threshold: 85.0,
            review_margin: 5.0,
            ..Self::default()
        }
    }

    /// Lenient preset: lower threshold, wider review band
    pub fn lenient() -> Self {
        Self {
            threshold: 60.0,
            review_margin: 15.0,
            ..Self::default()
        }
    }

    /// Override the threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Override the review margin
    pub fn with_review_margin(mut self, margin: f64) -> Self {
        self.review_margin = margin;
        self
    }

    /// Lower edge of the review band
    pub fn review_floor(&self) -> f64 {
        (self.threshold - self.review_margin).max(0.0)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MatcherError> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(MatcherError::Config("threshold must be within [0, 100]".to_string()));
        }
        if !(0.0..=100.0).contains(&self.review_margin) {
            return Err(MatcherError::Config(
                "review_margin must be within [0, 100]".to_string(),
            ));
        }
        if !self.name_weight.is_finite() || !self.address_weight.is_finite() {
            return Err(MatcherError::Config("weights must be finite".to_string()));
        }
        if self.name_weight < 0.0 || self.address_weight < 0.0 {
            return Err(MatcherError::Config("weights must be non-negative".to_string()));
        }
        if ((self.name_weight + self.address_weight) - 1.0).abs() > 1e-6 {
            return Err(MatcherError::Config(format!(
                "weights must sum to 1 (got {} + {})",
                self.name_weight, self.address_weight
            )));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, MatcherError> {
        toml::from_str(toml_str)
            .map_err(|e| MatcherError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, MatcherError> {
        toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatcherConfig::default();
        assert_eq!(config.threshold, 70.0);
        assert_eq!(config.review_margin, 10.0);
        assert_eq!(config.review_floor(), 60.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_valid() {
        assert!(MatcherConfig::strict().validate().is_ok());
        assert!(MatcherConfig::lenient().validate().is_ok());
        assert_eq!(MatcherConfig::strict().review_floor(), 80.0);
    }

    #[test]
    fn test_review_floor_saturates() {
        let config = MatcherConfig::default().with_threshold(5.0).with_review_margin(10.0);
        assert_eq!(config.review_floor(), 0.0);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = MatcherConfig {
            name_weight: 0.7,
            address_weight: 0.4,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_weight_invalid() {
        let config = MatcherConfig {
            name_weight: 1.2,
            address_weight: -0.2,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_weights_invalid() {
        let nan_weight = MatcherConfig {
            name_weight: f64::NAN,
            ..MatcherConfig::default()
        };
        assert!(nan_weight.validate().is_err());

        let infinite = MatcherConfig {
            name_weight: f64::INFINITY,
            address_weight: f64::NEG_INFINITY,
            ..MatcherConfig::default()
        };
        assert!(infinite.validate().is_err());

        let from_toml = MatcherConfig::from_toml("address_weight = nan").unwrap();
        assert!(from_toml.validate().is_err());
    }

    #[test]
    fn test_threshold_range() {
        assert!(MatcherConfig::default().with_threshold(101.0).validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MatcherConfig::strict();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(MatcherConfig::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = MatcherConfig::from_toml("threshold = 80").unwrap();
        assert_eq!(config.threshold, 80.0);
        assert_eq!(config.name_weight, 0.6);
    }
}
