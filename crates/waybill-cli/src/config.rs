//! Configuration management for the CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use waybill_extractor::ExtractorConfig;
use waybill_gatekeeper::ValidationConfig;
use waybill_matcher::MatcherConfig;
use waybill_pipeline::PipelineConfig;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// CLI configuration.
///
/// Precedence is command-line flag, then environment, then this file, then
/// built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Text-generation service
    #[serde(default)]
    pub service: ServiceSettings,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Candidate validation rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Directory matching
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Batch scheduling
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Text-generation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
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

    /// Default results CSV path
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,

    /// Default review queue CSV path
    #[serde(default = "default_review_path")]
    pub review_path: PathBuf,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".waybill").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default path.
    ///
    /// A missing file at the default path is created with defaults; a missing
    /// explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    let config = Self::default();
                    if let Err(e) = config.save_to(&path) {
                        tracing::warn!("Could not write default config to {}: {}", path.display(), e);
                    }
                    Ok(config)
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply command-line and environment overrides.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.service.base_url = base_url.clone();
        }
        if let Some(model) = &cli.model {
            self.service.model = model.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.extractor = self
                .extractor
                .clone()
                .with_request_timeout(Duration::from_secs_f64(secs.max(0.0)));
        }
        if let Some(threshold) = cli.threshold {
            self.matcher.threshold = threshold;
        }
        if let Some(margin) = cli.review_margin {
            self.matcher.review_margin = margin;
        }
        if cli.no_color {
            self.settings.color = false;
        }
        if let Some(format) = cli.format {
            self.settings.format = format.into();
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(CliError::Config("service.base_url must not be empty".to_string()));
        }
        if self.service.model.trim().is_empty() {
            return Err(CliError::Config("service.model must not be empty".to_string()));
        }
        self.extractor.validate()?;
        self.validation.validate()?;
        self.matcher.validate()?;
        self.pipeline
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(())
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            results_path: default_results_path(),
            review_path: default_review_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "phi".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_results_path() -> PathBuf {
    PathBuf::from("output/test_results.csv")
}

fn default_review_path() -> PathBuf {
    PathBuf::from("output/review_log.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:11434");
        assert_eq!(config.matcher.threshold, 70.0);
        assert!(config.settings.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [service]
            model = "phi3"

            [matcher]
            threshold = 75
            "#,
        )
        .unwrap();
        assert_eq!(config.service.model, "phi3");
        assert_eq!(config.service.base_url, "http://localhost:11434");
        assert_eq!(config.matcher.threshold, 75.0);
        assert_eq!(config.matcher.review_margin, 10.0);
        assert_eq!(config.extractor.prefix_chars, 300);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.service.model = "tinyllama".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.service.model, "tinyllama");
        assert_eq!(loaded.extractor.request_timeout_ms, 8_000);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "waybill",
            "--base-url",
            "http://gpu-box:11434",
            "--model",
            "phi3",
            "--timeout-secs",
            "2.5",
            "--threshold",
            "82",
            "--review-margin",
            "4",
            "--no-color",
            "check",
        ]);
        let mut config = Config::default();
        config.apply_overrides(&cli);

        assert_eq!(config.service.base_url, "http://gpu-box:11434");
        assert_eq!(config.service.model, "phi3");
        assert_eq!(config.extractor.request_timeout_ms, 2_500);
        assert_eq!(config.matcher.threshold, 82.0);
        assert_eq!(config.matcher.review_margin, 4.0);
        assert!(!config.settings.color);
    }

    #[test]
    fn test_invalid_section_rejected() {
        let mut config = Config::default();
        config.matcher.name_weight = 0.9;
        assert!(config.validate().is_err());
    }
}
