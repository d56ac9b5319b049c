//! Pipeline orchestrator

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use waybill_domain::{DirectoryEntry, LabelResult, LlmProvider, RawLabel};
use waybill_extractor::{normalize, ExtractionCoordinator, ExtractionFailure};
use waybill_matcher::DirectoryMatcher;

use crate::{BatchMetrics, PipelineConfig, PipelineError};

/// Normalize, extract and match labels against a shared directory
///
/// Cloning is cheap; clones share the coordinator, matcher and directory.
pub struct Pipeline<L> {
    coordinator: Arc<ExtractionCoordinator<L>>,
    matcher: Arc<DirectoryMatcher>,
    directory: Arc<[DirectoryEntry]>,
    config: PipelineConfig,
}

impl<L> Clone for Pipeline<L> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            matcher: Arc::clone(&self.matcher),
            directory: Arc::clone(&self.directory),
            config: self.config.clone(),
        }
    }
}

impl<L> Pipeline<L> {
    /// Directory entries every label is matched against
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl<L> Pipeline<L>
where
    L: LlmProvider + 'static,
    L::Error: Into<ExtractionFailure>,
{
    /// Assemble a pipeline; the directory is frozen from here on
    pub fn new(
        coordinator: ExtractionCoordinator<L>,
        matcher: DirectoryMatcher,
        directory: Vec<DirectoryEntry>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        matcher.config().validate()?;
        if directory.is_empty() {
            warn!("Recipient directory is empty, every pair will be UNMATCHED");
        }
        Ok(Self {
            coordinator: Arc::new(coordinator),
            matcher: Arc::new(matcher),
            directory: directory.into(),
            config,
        })
    }

    /// Process a single label
    ///
    /// Never fails: a label with no extractable pairs comes back `FAILED`.
    pub async fn process_label(&self, label: &RawLabel) -> LabelResult {
        let started = Instant::now();
        let cleaned = normalize(&label.raw_text);

        if cleaned.is_empty() {
            warn!(sample_id = %label.sample_id, "Label is empty after normalization");
            return LabelResult::failed(&label.sample_id, started.elapsed(), &label.raw_text);
        }

        let extraction = self.coordinator.extract(&cleaned).await;
        if let Some(failure) = &extraction.model_failure {
            debug!(sample_id = %label.sample_id, reason = failure.kind(), "Model extraction not used");
        }

        let matches = self.matcher.match_all(&extraction.pairs, &self.directory);
        let result = LabelResult::new(
            &label.sample_id,
            Some(extraction.mode),
            matches,
            started.elapsed(),
            &label.raw_text,
        );

        info!(
            sample_id = %result.sample_id,
            status = result.status.as_str(),
            mode = extraction.mode.as_str(),
            pairs = result.pairs.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Processed label"
        );
        result
    }

    /// Process labels one after another, in input order
    pub async fn process_batch(&self, labels: &[RawLabel]) -> Vec<LabelResult> {
        let mut results = Vec::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            debug!("Label {}/{}: {}", index + 1, labels.len(), label.sample_id);
            results.push(self.process_label(label).await);
        }
        results
    }

    /// Process labels as concurrent tasks, returning results in input order
    ///
    /// At most `max_concurrent_labels` labels are in flight; model requests
    /// are further bounded by the extractor. A task that panics yields a
    /// `FAILED` result for its label.
    pub async fn process_batch_concurrent(&self, labels: &[RawLabel]) -> Vec<LabelResult> {
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_labels));
        let handles: Vec<_> = labels
            .iter()
            .cloned()
            .map(|label| {
                let pipeline = self.clone();
                let permits = Arc::clone(&permits);
                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    pipeline.process_label(&label).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(labels.len());
        for (label, handle) in labels.iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(sample_id = %label.sample_id, "Label task failed: {}", e);
                    results.push(LabelResult::failed(&label.sample_id, Duration::ZERO, &label.raw_text));
                }
            }
        }
        results
    }

    /// Process a batch using the configured scheduling, with metrics
    pub async fn run(&self, labels: &[RawLabel]) -> (Vec<LabelResult>, BatchMetrics) {
        info!(
            "Processing {} labels ({})",
            labels.len(),
            if self.config.concurrent { "concurrent" } else { "sequential" }
        );
        let started = Instant::now();
        let results = if self.config.concurrent {
            self.process_batch_concurrent(labels).await
        } else {
            self.process_batch(labels).await
        };
        let metrics = BatchMetrics::from_results(&results, started.elapsed());
        info!("Batch finished:\n{}", metrics.summary());
        (results, metrics)
    }
}
