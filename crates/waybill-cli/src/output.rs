//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use waybill_domain::{ExtractedPair, LabelResult, MatchResult, MatchTier, SourceMode};
use waybill_pipeline::BatchMetrics;

use crate::config::OutputFormat;
use crate::error::Result;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

fn pair_json(pair: &ExtractedPair) -> serde_json::Value {
    serde_json::json!({
        "name": pair.name,
        "address": pair.address,
        "tracking_number": pair.tracking_number.as_ref().map(|t| t.as_str()),
        "carrier": pair.tracking_number.as_ref().map(|t| t.carrier.as_str()),
        "source_mode": pair.source_mode.as_str(),
        "raw_confidence": pair.raw_confidence,
    })
}

fn match_json(m: &MatchResult) -> serde_json::Value {
    serde_json::json!({
        "extracted": pair_json(&m.extracted),
        "recipient_id": m.best_entry.as_ref().and_then(|e| e.recipient_id.as_deref()),
        "matched_name": m.best_entry.as_ref().map(|e| e.full_name.as_str()),
        "matched_address": m.best_entry.as_ref().map(|e| e.address.as_str()),
        "name_score": m.name_score,
        "address_score": m.address_score,
        "combined_score": m.combined_score,
        "tier": m.tier.as_str(),
        "ambiguous": m.ambiguous,
    })
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format pairs extracted from a single label.
    pub fn format_pairs(&self, pairs: &[ExtractedPair], mode: SourceMode) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value = serde_json::json!({
                "mode": mode.as_str(),
                "pairs": pairs.iter().map(pair_json).collect::<Vec<_>>(),
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        if pairs.is_empty() {
            return Ok(self.colorize("No pairs extracted.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Address", "Tracking", "Carrier", "Mode"]);
        for pair in pairs {
            builder.push_record([
                pair.name.as_str(),
                pair.address.as_str(),
                pair.tracking_number.as_ref().map(|t| t.as_str()).unwrap_or("-"),
                pair.tracking_number
                    .as_ref()
                    .map(|t| t.carrier.as_str())
                    .unwrap_or("-"),
                pair.source_mode.as_str(),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format matches for a single label.
    pub fn format_matches(&self, matches: &[MatchResult]) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value: Vec<_> = matches.iter().map(match_json).collect();
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        if matches.is_empty() {
            return Ok(self.colorize("No pairs extracted.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Extracted", "Matched", "Name score", "Address score", "Combined", "Tier"]);
        for m in matches {
            let matched = m
                .best_entry
                .as_ref()
                .map(|e| match &e.recipient_id {
                    Some(id) => format!("{} ({})", e.full_name, id),
                    None => e.full_name.clone(),
                })
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                m.extracted.name.clone(),
                matched,
                format!("{:.1}", m.name_score),
                format!("{:.1}", m.address_score),
                format!("{:.2}", m.combined_score),
                self.tier(m.tier),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format a batch of label results.
    pub fn format_results(&self, results: &[LabelResult]) -> Result<String> {
        if self.format == OutputFormat::Json {
            let value: Vec<_> = results
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "sample_id": r.sample_id,
                        "status": r.status.as_str(),
                        "mode": r.mode_used.map(|m| m.as_str()),
                        "elapsed_ms": r.elapsed.as_millis() as u64,
                        "pairs": r.pairs.iter().map(match_json).collect::<Vec<_>>(),
                    })
                })
                .collect();
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        if results.is_empty() {
            return Ok(self.colorize("No labels processed.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Sample", "Status", "Mode", "Pairs", "Best match", "Tier", "ms"]);
        for r in results {
            let best = r
                .pairs
                .iter()
                .filter(|m| m.best_entry.is_some())
                .max_by(|a, b| a.combined_score.total_cmp(&b.combined_score));
            builder.push_record([
                r.sample_id.clone(),
                self.status(r),
                r.mode_used.map(|m| m.as_str()).unwrap_or("-").to_string(),
                r.pairs.len().to_string(),
                best.and_then(|m| m.best_entry.as_ref())
                    .map(|e| e.full_name.clone())
                    .unwrap_or_else(|| "-".to_string()),
                best.map(|m| self.tier(m.tier)).unwrap_or_else(|| "-".to_string()),
                r.elapsed.as_millis().to_string(),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format batch metrics.
    pub fn format_metrics(&self, metrics: &BatchMetrics) -> String {
        self.colorize(&metrics.summary(), "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn tier(&self, tier: MatchTier) -> String {
        let color = match tier {
            MatchTier::Confirmed => "green",
            MatchTier::Review => "yellow",
            MatchTier::Unmatched => "red",
        };
        self.colorize(tier.as_str(), color)
    }

    fn status(&self, result: &LabelResult) -> String {
        let color = match result.status {
            waybill_domain::LabelStatus::Success => "green",
            waybill_domain::LabelStatus::Partial => "yellow",
            waybill_domain::LabelStatus::Failed => "red",
        };
        self.colorize(result.status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
