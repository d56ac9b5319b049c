//! Extraction coordinator: model first, patterns on any failure

use std::sync::Arc;

use tracing::{info, warn};
use waybill_domain::{ExtractedPair, LlmProvider, SourceMode};
use waybill_gatekeeper::Gatekeeper;

use crate::error::{ExtractionFailure, ExtractorError};
use crate::model::ModelExtractor;
use crate::rules::PatternExtractor;
use crate::ExtractorConfig;

/// Pairs extracted from one label and the extractor that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Complete pairs, all tagged with `mode`
    pub pairs: Vec<ExtractedPair>,

    /// Extractor whose output was used
    pub mode: SourceMode,

    /// Why the model result was not used, when it was attempted and failed
    pub model_failure: Option<ExtractionFailure>,
}

impl Extraction {
    /// Whether no pair was extracted
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Orchestrates model extraction with pattern fallback
///
/// The model gets a single attempt per label. Any failure, including an
/// empty result, sends the label to the pattern extractor, whose output is
/// used unconditionally. Pairs from the two sources are never mixed.
pub struct ExtractionCoordinator<L> {
    model: Option<ModelExtractor<L>>,
    patterns: PatternExtractor,
}

impl<L> ExtractionCoordinator<L> {
    /// Coordinator that never contacts the model
    pub fn rules_only(gatekeeper: Gatekeeper, config: &ExtractorConfig) -> Self {
        Self {
            model: None,
            patterns: PatternExtractor::new(gatekeeper, config),
        }
    }

    /// Whether the model is attempted before the patterns
    pub fn uses_model(&self) -> bool {
        self.model.is_some()
    }
}

impl<L> ExtractionCoordinator<L>
where
    L: LlmProvider,
    L::Error: Into<ExtractionFailure>,
{
    /// Create a coordinator; the model is skipped when `config.use_model` is off
    ///
    /// Fails when `config` does not validate.
    pub fn new(provider: Arc<L>, gatekeeper: Gatekeeper, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        let patterns = PatternExtractor::new(gatekeeper.clone(), &config);
        let model = config
            .use_model
            .then(|| ModelExtractor::new(provider, gatekeeper, config));
        Ok(Self { model, patterns })
    }

    /// Extract pairs from cleaned text
    ///
    /// Never fails. Pairs lacking a name or an address are discarded, so
    /// both extractors coming up empty yields an empty [`Extraction`].
    pub async fn extract(&self, cleaned_text: &str) -> Extraction {
        let mut model_failure = None;

        if let Some(model) = &self.model {
            match model.extract(cleaned_text).await {
                Ok(pairs) => {
                    let pairs = retain_complete(pairs);
                    if !pairs.is_empty() {
                        info!("Using model extraction ({} pairs)", pairs.len());
                        return Extraction {
                            pairs,
                            mode: SourceMode::Model,
                            model_failure: None,
                        };
                    }
                    model_failure = Some(ExtractionFailure::EmptyResult);
                }
                Err(failure) => {
                    warn!(reason = failure.kind(), "Model extraction failed, falling back to patterns: {}", failure);
                    model_failure = Some(failure);
                }
            }
        }

        let pairs = retain_complete(self.patterns.extract(cleaned_text));
        info!("Using pattern extraction ({} pairs)", pairs.len());
        Extraction {
            pairs,
            mode: SourceMode::Rule,
            model_failure,
        }
    }
}

fn retain_complete(mut pairs: Vec<ExtractedPair>) -> Vec<ExtractedPair> {
    pairs.retain(ExtractedPair::is_complete);
    pairs
}
