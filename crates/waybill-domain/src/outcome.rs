//! Match and label outcomes
//!
//! A [`MatchResult`] reconciles one extracted pair against the directory; a
//! [`LabelResult`] collects every match for one label and is the terminal
//! artifact handed to output writers.

use std::fmt;
use std::time::Duration;

use crate::{DirectoryEntry, ExtractedPair, SourceMode};

/// Confidence band a match lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    /// Combined score reached the threshold
    Confirmed,

    /// Combined score fell inside the review margin below the threshold
    Review,

    /// Everything else, including matches against an empty directory
    Unmatched,
}

impl MatchTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Confirmed => "CONFIRMED",
            MatchTier::Review => "REVIEW",
            MatchTier::Unmatched => "UNMATCHED",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CONFIRMED" => Some(MatchTier::Confirmed),
            "REVIEW" => Some(MatchTier::Review),
            "UNMATCHED" => Some(MatchTier::Unmatched),
            _ => None,
        }
    }

    /// Whether the tier counts toward a successful label
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchTier::Confirmed | MatchTier::Review)
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid match tier: {}", s))
    }
}

/// Result of scoring one extracted pair against the directory
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The pair that was scored
    pub extracted: ExtractedPair,

    /// Highest-scoring entry; absent only when the directory is empty
    pub best_entry: Option<DirectoryEntry>,

    /// Name similarity against the best entry (0-100)
    pub name_score: f64,

    /// Address similarity against the best entry (0-100)
    pub address_score: f64,

    /// Weighted combination of the two scores (0-100)
    pub combined_score: f64,

    /// Confidence band
    pub tier: MatchTier,

    /// Another entry also reached the confirm threshold
    pub ambiguous: bool,
}

impl MatchResult {
    /// Result for a pair scored against an empty directory
    pub fn unmatched(extracted: ExtractedPair) -> Self {
        Self {
            extracted,
            best_entry: None,
            name_score: 0.0,
            address_score: 0.0,
            combined_score: 0.0,
            tier: MatchTier::Unmatched,
            ambiguous: false,
        }
    }
}

/// Overall outcome of one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelStatus {
    /// At least one pair was confirmed or sent to review
    Success,

    /// Pairs were extracted but none matched the directory
    Partial,

    /// Nothing was extracted
    Failed,
}

impl LabelStatus {
    /// Derive the status from a label's matches
    pub fn from_matches(matches: &[MatchResult]) -> Self {
        if matches.is_empty() {
            LabelStatus::Failed
        } else if matches.iter().any(|m| m.tier.is_matched()) {
            LabelStatus::Success
        } else {
            LabelStatus::Partial
        }
    }

    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelStatus::Success => "SUCCESS",
            LabelStatus::Partial => "PARTIAL",
            LabelStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for LabelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal artifact for one input label
#[derive(Debug, Clone)]
pub struct LabelResult {
    /// Identifier from the input batch
    pub sample_id: String,

    /// Overall outcome
    pub status: LabelStatus,

    /// Extractor whose pairs were used; absent when extraction was skipped
    pub mode_used: Option<SourceMode>,

    /// One match per extracted pair, in extraction order
    pub pairs: Vec<MatchResult>,

    /// Wall-clock time spent on the label
    pub elapsed: Duration,

    /// Original OCR text, kept for the review queue
    pub raw_text: String,
}

impl LabelResult {
    /// Assemble a result, deriving the status from the matches
    pub fn new(
        sample_id: impl Into<String>,
        mode_used: Option<SourceMode>,
        pairs: Vec<MatchResult>,
        elapsed: Duration,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            status: LabelStatus::from_matches(&pairs),
            mode_used,
            pairs,
            elapsed,
            raw_text: raw_text.into(),
        }
    }

    /// A label that could not be processed at all
    pub fn failed(sample_id: impl Into<String>, elapsed: Duration, raw_text: impl Into<String>) -> Self {
        Self::new(sample_id, None, Vec::new(), elapsed, raw_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_tier(tier: MatchTier) -> MatchResult {
        MatchResult {
            tier,
            ..MatchResult::unmatched(ExtractedPair::new("Jane Doe", "1 Elm St", SourceMode::Rule))
        }
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!(MatchTier::parse("confirmed"), Some(MatchTier::Confirmed));
        assert_eq!("REVIEW".parse::<MatchTier>().unwrap(), MatchTier::Review);
        assert!("maybe".parse::<MatchTier>().is_err());
    }

    #[test]
    fn test_status_failed_without_pairs() {
        assert_eq!(LabelStatus::from_matches(&[]), LabelStatus::Failed);
    }

    #[test]
    fn test_status_success_on_review() {
        let matches = vec![
            result_with_tier(MatchTier::Unmatched),
            result_with_tier(MatchTier::Review),
        ];
        assert_eq!(LabelStatus::from_matches(&matches), LabelStatus::Success);
    }

    #[test]
    fn test_status_partial_when_all_unmatched() {
        let matches = vec![result_with_tier(MatchTier::Unmatched)];
        assert_eq!(LabelStatus::from_matches(&matches), LabelStatus::Partial);
    }

    #[test]
    fn test_failed_label_has_no_mode() {
        let label = LabelResult::failed("s1", Duration::from_millis(3), "");
        assert_eq!(label.status, LabelStatus::Failed);
        assert!(label.mode_used.is_none());
    }
}
