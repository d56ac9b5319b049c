//! Waybill Pipeline
//!
//! Runs each label through normalization, extraction and directory matching
//! and assembles the per-label result.
//!
//! Labels are independent: the directory is shared read-only and one label's
//! failure never aborts a batch. Batches run sequentially or as concurrent
//! tasks; results always come back in input order.

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use metrics::BatchMetrics;
pub use pipeline::Pipeline;
