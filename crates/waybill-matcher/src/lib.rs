//! Waybill Matcher
//!
//! Reconciles extracted (name, address) pairs against the recipient
//! directory.
//!
//! Every entry is scored with a token-set name similarity (tolerant of
//! first/last order swaps and partial names) and a token-sort similarity
//! over normalized addresses. The weighted combination picks the best entry
//! and decides its tier: confirmed, sent to review, or unmatched.
//!
//! # Examples
//!
//! ```
//! use waybill_domain::{DirectoryEntry, ExtractedPair, MatchTier, SourceMode};
//! use waybill_matcher::{DirectoryMatcher, MatcherConfig};
//!
//! let directory = vec![DirectoryEntry::new("John Smith", "123 Main Street, Anytown, CA 12345")];
//! let pair = ExtractedPair::new("Smith John", "123 Main St, Anytown CA 12345", SourceMode::Rule);
//!
//! let matcher = DirectoryMatcher::new(MatcherConfig::default());
//! let result = matcher.match_pair(&pair, &directory);
//! assert_eq!(result.tier, MatchTier::Confirmed);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod matcher;
pub mod similarity;

pub use config::MatcherConfig;
pub use error::MatcherError;
pub use matcher::{DirectoryMatcher, EntryScore};
pub use similarity::{address_similarity, name_similarity, normalize_address};
