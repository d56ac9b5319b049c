//! Command implementations.

pub mod check;
pub mod extract;
pub mod run;

pub use self::check::execute_check;
pub use self::extract::execute_extract;
pub use self::run::execute_run;

use std::sync::Arc;

use waybill_domain::DirectoryEntry;
use waybill_extractor::ExtractionCoordinator;
use waybill_gatekeeper::Gatekeeper;
use waybill_llm::OllamaProvider;
use waybill_matcher::DirectoryMatcher;
use waybill_pipeline::Pipeline;

use crate::config::Config;
use crate::error::Result;

/// Extraction coordinator backed by the configured service
pub fn build_coordinator(config: &Config, rules_only: bool) -> Result<ExtractionCoordinator<OllamaProvider>> {
    let mut extractor = config.extractor.clone();
    if rules_only {
        extractor.use_model = false;
    }
    let provider = Arc::new(OllamaProvider::new(&config.service.base_url, &config.service.model));
    Ok(ExtractionCoordinator::new(
        provider,
        Gatekeeper::new(config.validation.clone()),
        extractor,
    )?)
}

/// Full pipeline over a loaded directory
pub fn build_pipeline(
    config: &Config,
    directory: Vec<DirectoryEntry>,
    rules_only: bool,
    concurrent: bool,
) -> Result<Pipeline<OllamaProvider>> {
    let mut pipeline_config = config.pipeline.clone();
    pipeline_config.concurrent |= concurrent;
    Ok(Pipeline::new(
        build_coordinator(config, rules_only)?,
        DirectoryMatcher::new(config.matcher.clone()),
        directory,
        pipeline_config,
    )?)
}
