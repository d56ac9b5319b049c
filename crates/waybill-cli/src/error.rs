//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// These are the only fatal errors in the system; label-level problems are
/// reported in the results instead.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline assembly error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] waybill_pipeline::PipelineError),

    /// Text-generation service error
    #[error("Service error: {0}")]
    Service(#[from] waybill_llm::LlmError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<waybill_extractor::ExtractorError> for CliError {
    fn from(e: waybill_extractor::ExtractorError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<waybill_matcher::MatcherError> for CliError {
    fn from(e: waybill_matcher::MatcherError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<waybill_gatekeeper::GatekeeperError> for CliError {
    fn from(e: waybill_gatekeeper::GatekeeperError) -> Self {
        CliError::Config(e.to_string())
    }
}
