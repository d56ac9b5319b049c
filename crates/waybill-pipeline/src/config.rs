//! Configuration for batch processing

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Controls how a batch is scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Process labels as concurrent tasks instead of one after another
    pub concurrent: bool,

    /// Upper bound on labels in flight when `concurrent` is set
    pub max_concurrent_labels: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrent: false,
            max_concurrent_labels: 16,
        }
    }
}

impl PipelineConfig {
    /// Concurrent processing with the default bound
    pub fn concurrent() -> Self {
        Self {
            concurrent: true,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_concurrent_labels == 0 {
            return Err(PipelineError::Config(
                "max_concurrent_labels must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
