//! Waybill Domain Layer
//!
//! Value types and trait seams shared by every other waybill crate. Apart from
//! an optional `serde` feature this crate has no external dependencies.
//!
//! ## Key Concepts
//!
//! - **RawLabel**: one OCR text block scanned from a shipping label
//! - **ExtractedPair**: a (name, address, tracking number) tuple pulled from a label
//! - **SourceMode**: which extractor (model or rules) produced a pair
//! - **DirectoryEntry**: a known recipient from the reference directory
//! - **MatchResult / MatchTier**: how well a pair reconciles with the directory
//! - **LabelResult / LabelStatus**: the terminal artifact for one label
//!
//! ## Architecture
//!
//! - Pure data and business rules only
//! - Infrastructure (HTTP, CSV, regex catalogs) lives in other crates
//! - The remote text-generation service is reached through [`traits::LlmProvider`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod label;
pub mod outcome;
pub mod pair;
pub mod traits;

// Re-exports for convenience
pub use directory::DirectoryEntry;
pub use label::{CleanedText, RawLabel};
pub use outcome::{LabelResult, LabelStatus, MatchResult, MatchTier};
pub use pair::{Carrier, ExtractedPair, SourceMode, TrackingNumber};
pub use traits::{GenerationOptions, LlmProvider};
