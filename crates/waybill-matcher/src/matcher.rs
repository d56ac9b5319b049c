//! Directory matcher

use tracing::debug;
use waybill_domain::{DirectoryEntry, ExtractedPair, MatchResult, MatchTier};

use crate::similarity::{address_similarity, name_similarity};
use crate::MatcherConfig;

/// Scores of one pair against one directory entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryScore {
    /// Best name similarity over the entry's full name and aliases
    pub name: f64,

    /// Address similarity
    pub address: f64,

    /// Weighted combination
    pub combined: f64,
}

impl EntryScore {
    /// Higher combined score, or an equal combined score with a higher name score
    pub fn outranks(&self, other: &EntryScore) -> bool {
        self.combined > other.combined
            || (self.combined == other.combined && self.name > other.name)
    }
}

/// Scores extracted pairs against a read-only recipient directory
#[derive(Debug, Clone, Default)]
pub struct DirectoryMatcher {
    config: MatcherConfig,
}

impl DirectoryMatcher {
    /// Create a matcher with the given configuration
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Get the matcher configuration
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Weighted combination of a name and an address score, rounded to 2 decimals
    pub fn combine(&self, name_score: f64, address_score: f64) -> f64 {
        let combined =
            self.config.name_weight * name_score + self.config.address_weight * address_score;
        (combined.clamp(0.0, 100.0) * 100.0).round() / 100.0
    }

    /// Tier for a combined score
    pub fn tier_for(&self, combined_score: f64) -> MatchTier {
        if combined_score >= self.config.threshold {
            MatchTier::Confirmed
        } else if combined_score >= self.config.review_floor() {
            MatchTier::Review
        } else {
            MatchTier::Unmatched
        }
    }

    /// Score a pair against a single entry
    pub fn score_entry(&self, pair: &ExtractedPair, entry: &DirectoryEntry) -> EntryScore {
        let name = entry
            .names()
            .map(|candidate| name_similarity(&pair.name, candidate))
            .fold(0.0, f64::max);
        let address = address_similarity(&pair.address, &entry.address);
        EntryScore {
            name,
            address,
            combined: self.combine(name, address),
        }
    }

    /// Match a pair against the directory
    ///
    /// The entry with the highest combined score wins; ties go to the higher
    /// name score, then to the earlier entry. An empty directory yields an
    /// unmatched result with no entry.
    pub fn match_pair(&self, pair: &ExtractedPair, directory: &[DirectoryEntry]) -> MatchResult {
        let mut best: Option<(usize, EntryScore)> = None;
        let mut confirmed = 0usize;

        for (index, entry) in directory.iter().enumerate() {
            let score = self.score_entry(pair, entry);
            if score.combined >= self.config.threshold {
                confirmed += 1;
            }
            if best.is_none_or(|(_, current)| score.outranks(&current)) {
                best = Some((index, score));
            }
        }

        let Some((index, score)) = best else {
            debug!(name = %pair.name, "Empty directory, pair unmatched");
            return MatchResult::unmatched(pair.clone());
        };

        let tier = self.tier_for(score.combined);
        let entry = &directory[index];
        debug!(
            name = %pair.name,
            matched = %entry.full_name,
            combined = score.combined,
            tier = tier.as_str(),
            "Matched pair"
        );

        MatchResult {
            extracted: pair.clone(),
            best_entry: Some(entry.clone()),
            name_score: score.name,
            address_score: score.address,
            combined_score: score.combined,
            tier,
            ambiguous: confirmed > 1,
        }
    }

    /// Match every pair, preserving order
    pub fn match_all(&self, pairs: &[ExtractedPair], directory: &[DirectoryEntry]) -> Vec<MatchResult> {
        pairs.iter().map(|pair| self.match_pair(pair, directory)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use waybill_domain::SourceMode;

    fn pair(name: &str, address: &str) -> ExtractedPair {
        ExtractedPair::new(name, address, SourceMode::Rule)
    }

    fn directory() -> Vec<DirectoryEntry> {
        vec![
            DirectoryEntry::new("Mary Major", "77 Pine Rd, Atlanta GA 30301").with_id("R1"),
            DirectoryEntry::new("John Smith", "123 Main Street, Anytown, CA 12345")
                .with_id("R2")
                .with_alias("Johnny Smith"),
            DirectoryEntry::new("Jane Doe", "4500 N Lamar Blvd Apt 12B, Austin TX 78756").with_id("R3"),
        ]
    }

    #[test]
    fn test_verbatim_entry_scores_100() {
        let matcher = DirectoryMatcher::default();
        for entry in directory() {
            let result = matcher.match_pair(&pair(&entry.full_name, &entry.address), &directory());
            assert_eq!(result.combined_score, 100.0);
            assert_eq!(result.tier, MatchTier::Confirmed);
            assert_eq!(result.best_entry.as_ref(), Some(&entry));
            assert!(!result.ambiguous);
        }
    }

    #[test]
    fn test_empty_directory_unmatched() {
        let matcher = DirectoryMatcher::default();
        let result = matcher.match_pair(&pair("John Smith", "123 Main St, Anytown CA 12345"), &[]);
        assert_eq!(result.tier, MatchTier::Unmatched);
        assert!(result.best_entry.is_none());
        assert_eq!(result.combined_score, 0.0);
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let entries = vec![
            DirectoryEntry::new("Jan Leer", "12 Oak St, Dover DE 19901").with_id("FIRST"),
            DirectoryEntry::new("Jan Leer", "12 Oak St, Dover DE 19901").with_id("SECOND"),
        ];
        let result = DirectoryMatcher::default().match_pair(&pair("Jon Lees", "12 Oak St, Dover DE 19901"), &entries);

        assert_eq!(result.name_score, 75.0);
        assert_eq!(result.combined_score, 85.0);
        assert_eq!(result.best_entry.unwrap().recipient_id.as_deref(), Some("FIRST"));
        assert!(result.ambiguous);
    }

    #[test]
    fn test_equal_combined_prefers_name_score() {
        let strong_name = EntryScore { name: 100.0, address: 50.0, combined: 80.0 };
        let strong_address = EntryScore { name: 75.0, address: 87.5, combined: 80.0 };
        assert!(strong_name.outranks(&strong_address));
        assert!(!strong_address.outranks(&strong_name));
        assert!(!strong_name.outranks(&strong_name));
    }

    #[test]
    fn test_order_swapped_name_and_long_form_address() {
        let result = DirectoryMatcher::default()
            .match_pair(&pair("Smith John", "123 Main St, Anytown CA 12345"), &directory());
        assert_eq!(result.best_entry.unwrap().recipient_id.as_deref(), Some("R2"));
        assert_eq!(result.combined_score, 100.0);
    }

    #[test]
    fn test_alias_scores_as_name() {
        let result = DirectoryMatcher::default()
            .match_pair(&pair("Johnny Smith", "123 Main St, Anytown CA 12345"), &directory());
        assert_eq!(result.name_score, 100.0);
        assert_eq!(result.tier, MatchTier::Confirmed);
    }

    #[test]
    fn test_unknown_recipient_unmatched_but_best_entry_reported() {
        let result = DirectoryMatcher::default()
            .match_pair(&pair("Zed Quill", "9 Elm Rd, Reno NV 89501"), &directory());
        assert_eq!(result.tier, MatchTier::Unmatched);
        assert!(result.best_entry.is_some());
        assert!(result.combined_score < 60.0);
    }

    #[test]
    fn test_tier_boundaries() {
        let matcher = DirectoryMatcher::default();
        assert_eq!(matcher.tier_for(70.0), MatchTier::Confirmed);
        assert_eq!(matcher.tier_for(69.99), MatchTier::Review);
        assert_eq!(matcher.tier_for(60.0), MatchTier::Review);
        assert_eq!(matcher.tier_for(59.99), MatchTier::Unmatched);
    }

    #[test]
    fn test_zero_margin_disables_review() {
        let matcher = DirectoryMatcher::new(MatcherConfig::default().with_review_margin(0.0));
        assert_eq!(matcher.tier_for(69.0), MatchTier::Unmatched);
    }

    #[test]
    fn test_match_all_preserves_order() {
        let pairs = vec![
            pair("Jane Doe", "4500 N Lamar Blvd Apt 12B, Austin TX 78756"),
            pair("Mary Major", "77 Pine Rd, Atlanta GA 30301"),
        ];
        let results = DirectoryMatcher::default().match_all(&pairs, &directory());
        let ids: Vec<_> = results
            .iter()
            .map(|r| r.best_entry.as_ref().and_then(|e| e.recipient_id.clone()))
            .collect();
        assert_eq!(ids, vec![Some("R3".to_string()), Some("R1".to_string())]);
    }

    proptest! {
        #[test]
        fn prop_combined_monotonic(
            name in 0.0f64..=100.0,
            address in 0.0f64..=100.0,
            bump in 0.0f64..=100.0,
        ) {
            let matcher = DirectoryMatcher::default();
            let base = matcher.combine(name, address);
            prop_assert!(matcher.combine((name + bump).min(100.0), address) >= base);
            prop_assert!(matcher.combine(name, (address + bump).min(100.0)) >= base);
        }

        #[test]
        fn prop_combined_in_range(name in 0.0f64..=100.0, address in 0.0f64..=100.0) {
            let combined = DirectoryMatcher::default().combine(name, address);
            prop_assert!((0.0..=100.0).contains(&combined));
        }

        #[test]
        fn prop_matching_is_deterministic(
            name in "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,2}",
            address in "[0-9]{1,4} [A-Za-z]{2,8} (St|Ave|Rd), [A-Za-z]{3,8} [A-Z]{2} [0-9]{5}",
            names in proptest::collection::vec("[A-Za-z]{1,8} [A-Za-z]{1,8}", 0..6),
        ) {
            let entries: Vec<DirectoryEntry> = names
                .iter()
                .enumerate()
                .map(|(i, n)| DirectoryEntry::new(n.clone(), format!("{} Main St, Dover DE 19901", i)))
                .collect();
            let matcher = DirectoryMatcher::default();
            let candidate = pair(&name, &address);
            prop_assert_eq!(
                matcher.match_pair(&candidate, &entries),
                matcher.match_pair(&candidate, &entries)
            );
        }

        #[test]
        fn prop_scores_bounded(name in "[A-Za-z ]{0,20}", address in "[A-Za-z0-9 ,]{0,30}") {
            let entry = DirectoryEntry::new("John Smith", "123 Main St, Anytown CA 12345");
            let score = DirectoryMatcher::default().score_entry(&pair(&name, &address), &entry);
            prop_assert!((0.0..=100.0).contains(&score.name));
            prop_assert!((0.0..=100.0).contains(&score.address));
            prop_assert!((0.0..=100.0).contains(&score.combined));
        }
    }
}
