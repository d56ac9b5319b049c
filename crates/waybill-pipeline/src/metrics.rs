//! Metrics collected over a batch run

use std::collections::HashMap;
use std::time::Duration;

use waybill_domain::{LabelResult, LabelStatus, MatchTier, SourceMode};

/// Counts and timings for one batch
#[derive(Debug, Clone, Default)]
pub struct BatchMetrics {
    /// Labels per status
    pub statuses: HashMap<LabelStatus, usize>,

    /// Labels per extraction mode
    pub modes: HashMap<SourceMode, usize>,

    /// Labels that skipped extraction (empty after normalization)
    pub skipped: usize,

    /// Pairs per match tier
    pub tiers: HashMap<MatchTier, usize>,

    /// Sum of per-label elapsed times
    pub label_time: Duration,

    /// Wall-clock time for the whole batch
    pub wall_time: Duration,
}

impl BatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect metrics over a finished batch
    pub fn from_results(results: &[LabelResult], wall_time: Duration) -> Self {
        let mut metrics = Self::new();
        for result in results {
            metrics.record(result);
        }
        metrics.wall_time = wall_time;
        metrics
    }

    /// Record one label
    pub fn record(&mut self, result: &LabelResult) {
        *self.statuses.entry(result.status).or_insert(0) += 1;
        match result.mode_used {
            Some(mode) => *self.modes.entry(mode).or_insert(0) += 1,
            None => self.skipped += 1,
        }
        for pair in &result.pairs {
            *self.tiers.entry(pair.tier).or_insert(0) += 1;
        }
        self.label_time += result.elapsed;
    }

    /// Labels recorded
    pub fn total_labels(&self) -> usize {
        self.statuses.values().sum()
    }

    /// Pairs recorded
    pub fn total_pairs(&self) -> usize {
        self.tiers.values().sum()
    }

    /// Labels with the given status
    pub fn status_count(&self, status: LabelStatus) -> usize {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    /// Labels extracted in the given mode
    pub fn mode_count(&self, mode: SourceMode) -> usize {
        self.modes.get(&mode).copied().unwrap_or(0)
    }

    /// Pairs in the given tier
    pub fn tier_count(&self, tier: MatchTier) -> usize {
        self.tiers.get(&tier).copied().unwrap_or(0)
    }

    /// Mean per-label elapsed time
    pub fn mean_label_time(&self) -> Duration {
        match u32::try_from(self.total_labels()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.label_time / n,
        }
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Labels: {}", self.total_labels()),
        ];

        for status in [LabelStatus::Success, LabelStatus::Partial, LabelStatus::Failed] {
            lines.push(format!("  {}: {}", status, self.status_count(status)));
        }

        lines.push("Extraction mode:".to_string());
        for mode in [SourceMode::Model, SourceMode::Rule] {
            lines.push(format!("  {}: {}", mode, self.mode_count(mode)));
        }
        if self.skipped > 0 {
            lines.push(format!("  skipped: {}", self.skipped));
        }

        lines.push(format!("Pairs: {}", self.total_pairs()));
        for tier in [MatchTier::Confirmed, MatchTier::Review, MatchTier::Unmatched] {
            lines.push(format!("  {}: {}", tier, self.tier_count(tier)));
        }

        lines.push(format!("Mean label time: {:.1}ms", self.mean_label_time().as_secs_f64() * 1000.0));
        lines.push(format!("Wall time: {:.2}s", self.wall_time.as_secs_f64()));
        lines.join("\n")
    }
}
