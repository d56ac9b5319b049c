//! Error types for pipeline setup

use thiserror::Error;
use waybill_extractor::ExtractorError;
use waybill_matcher::MatcherError;

/// Errors that can occur while assembling a pipeline
///
/// Label processing itself never fails; problems surface as `FAILED` labels.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extractor configuration rejected
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Matcher configuration rejected
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}
