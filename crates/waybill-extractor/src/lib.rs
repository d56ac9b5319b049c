//! Waybill Extractor
//!
//! Turns cleaned OCR text from a shipping label into validated
//! (name, address, tracking number) pairs.
//!
//! # Architecture
//!
//! ```text
//! raw text → normalize → ExtractionCoordinator ─┬→ ModelExtractor → Gatekeeper
//!                                               └→ PatternExtractor (fallback)
//! ```
//!
//! # Key Features
//!
//! - **Text normalization**: control characters, whitespace and typographic
//!   artifacts removed before either extractor runs
//! - **Model extraction**: one bounded-time request per label, structured
//!   output parsing with a recovery scan, denylist and address-shape checks
//! - **Pattern extraction**: ordered catalogs of tracking, address and name
//!   patterns with span claiming and positional association
//! - **Fallback policy**: any model failure or empty result switches the
//!   label to pattern extraction; sources are never mixed
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use waybill_extractor::{normalize, ExtractionCoordinator, ExtractorConfig, ExtractorError};
//! use waybill_gatekeeper::Gatekeeper;
//! use waybill_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), ExtractorError> {
//! let provider = Arc::new(OllamaProvider::default_endpoint("llama3.2:3b"));
//! let coordinator = ExtractionCoordinator::new(provider, Gatekeeper::default(), ExtractorConfig::default())?;
//!
//! let cleaned = normalize("SHIP TO: JANE DOE\n9 ELM RD, RENO NV 89501");
//! let extraction = coordinator.extract(&cleaned).await;
//! println!("{} pairs via {}", extraction.pairs.len(), extraction.mode);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod coordinator;
mod error;
mod format;
mod model;
mod normalizer;
mod parser;
mod patterns;
mod prompt;
mod rules;
pub mod tracking;


pub use config::ExtractorConfig;
pub use coordinator::{Extraction, ExtractionCoordinator};
pub use error::{ExtractionFailure, ExtractorError};
pub use format::{format_name, format_place, format_zip};
pub use model::ModelExtractor;
pub use normalizer::normalize;
pub use parser::{parse_model_response, RawCandidate};
pub use prompt::{truncate_chars, PromptBuilder};
pub use rules::PatternExtractor;
