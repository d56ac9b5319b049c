//! Error types for the Extractor

use thiserror::Error;
use waybill_llm::LlmError;

/// Why a model extraction attempt produced nothing usable
///
/// Always recoverable: the coordinator answers every variant by falling back
/// to pattern extraction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// The service could not be reached
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete within its time budget
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status
    #[error("service error: {0}")]
    ServiceError(String),

    /// The configured model is not installed on the service
    #[error("model not available: {0}")]
    ModelNotAvailable(String),

    /// The response could not be parsed, even by the recovery scan
    #[error("malformed output: {0}")]
    MalformedOutput(String),

    /// Parsing succeeded but no candidate survived validation
    #[error("no valid pairs in response")]
    EmptyResult,
}

impl ExtractionFailure {
    /// Short stable label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionFailure::Unreachable(_) => "unreachable",
            ExtractionFailure::Timeout => "timeout",
            ExtractionFailure::ServiceError(_) => "service_error",
            ExtractionFailure::ModelNotAvailable(_) => "model_not_available",
            ExtractionFailure::MalformedOutput(_) => "malformed_output",
            ExtractionFailure::EmptyResult => "empty_result",
        }
    }
}

impl From<LlmError> for ExtractionFailure {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Communication(message) if message.starts_with("HTTP ") => {
                ExtractionFailure::ServiceError(message)
            }
            LlmError::Communication(message) => ExtractionFailure::Unreachable(message),
            LlmError::Timeout => ExtractionFailure::Timeout,
            LlmError::InvalidResponse(message) => ExtractionFailure::MalformedOutput(message),
            LlmError::RateLimitExceeded => {
                ExtractionFailure::ServiceError("rate limit exceeded".to_string())
            }
            LlmError::ModelNotAvailable(model) => ExtractionFailure::ModelNotAvailable(model),
            LlmError::Other(message) => ExtractionFailure::ServiceError(message),
        }
    }
}

/// Errors raised while setting up extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        assert_eq!(ExtractionFailure::from(LlmError::Timeout), ExtractionFailure::Timeout);
        assert_eq!(
            ExtractionFailure::from(LlmError::Communication("Request failed: refused".into())).kind(),
            "unreachable"
        );
        assert_eq!(
            ExtractionFailure::from(LlmError::Communication("HTTP 500: boom".into())).kind(),
            "service_error"
        );
        assert_eq!(
            ExtractionFailure::from(LlmError::ModelNotAvailable("m".into())),
            ExtractionFailure::ModelNotAvailable("m".into())
        );
        assert_eq!(
            ExtractionFailure::from(LlmError::InvalidResponse("bad".into())).kind(),
            "malformed_output"
        );
    }
}
