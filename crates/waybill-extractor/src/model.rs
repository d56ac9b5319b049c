//! Model-based extraction

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use waybill_domain::{ExtractedPair, LlmProvider, SourceMode};
use waybill_gatekeeper::Gatekeeper;

use crate::error::ExtractionFailure;
use crate::format::format_name;
use crate::parser::{parse_model_response, RawCandidate};
use crate::prompt::PromptBuilder;
use crate::tracking::recognize;
use crate::ExtractorConfig;

/// Extracts pairs by asking a remote text-generation model
///
/// Each call makes exactly one request, bounded by the configured timeout.
/// Concurrent callers share a permit pool so that at most
/// `max_concurrent_requests` requests are in flight; waiting for a permit is
/// not counted against the timeout.
pub struct ModelExtractor<L> {
    provider: Arc<L>,
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
    permits: Arc<Semaphore>,
}

impl<L> ModelExtractor<L>
where
    L: LlmProvider,
    L::Error: Into<ExtractionFailure>,
{
    /// Create a new model extractor
    pub fn new(provider: Arc<L>, gatekeeper: Gatekeeper, config: ExtractorConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_requests.max(1)));
        Self {
            provider,
            gatekeeper,
            config,
            permits,
        }
    }

    /// Name of the model requests go to
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Extract validated pairs from cleaned text
    ///
    /// Returns `EmptyResult` when the response parsed but no candidate
    /// survived validation.
    pub async fn extract(&self, cleaned_text: &str) -> Result<Vec<ExtractedPair>, ExtractionFailure> {
        let prompt = PromptBuilder::new(cleaned_text, self.config.prefix_chars).build();
        debug!("Prompt length: {} chars", prompt.len());

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ExtractionFailure::ServiceError("request pool closed".to_string()))?;

        let response = timeout(
            self.config.request_timeout(),
            self.provider.generate(&prompt, &self.config.generation),
        )
        .await
        .map_err(|_| ExtractionFailure::Timeout)?
        .map_err(Into::<ExtractionFailure>::into)?;

        debug!("Model response length: {} chars", response.len());

        let candidates = parse_model_response(&response)?;
        let parsed = candidates.len();
        let pairs: Vec<ExtractedPair> = candidates
            .into_iter()
            .filter_map(|candidate| self.validate(candidate))
            .collect();

        info!(
            model = self.provider.model_name(),
            "Model extraction: {} parsed, {} valid",
            parsed,
            pairs.len()
        );

        if pairs.is_empty() {
            return Err(ExtractionFailure::EmptyResult);
        }
        Ok(pairs)
    }

    fn validate(&self, candidate: RawCandidate) -> Option<ExtractedPair> {
        let name = candidate.name.unwrap_or_default();
        let address = candidate.address.unwrap_or_default();

        let result = self.gatekeeper.validate_fields(&name, &address);
        if !result.is_accepted() {
            let reasons: Vec<String> = result.reasons.iter().map(ToString::to_string).collect();
            info!(name = %name, "Rejected model candidate: {}", reasons.join("; "));
            return None;
        }

        let mut pair = ExtractedPair::new(format_name(&name), address, SourceMode::Model);
        if let Some(raw) = candidate.tracking {
            match recognize(&raw) {
                Some(tracking) => pair = pair.with_tracking(tracking),
                None => warn!(tracking = %raw, "Dropping unrecognized tracking number"),
            }
        }
        if let Some(confidence) = candidate.confidence {
            pair = pair.with_confidence(confidence);
        }
        Some(pair)
    }
}
