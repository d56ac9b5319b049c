//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Generation parameters sent with every extraction request
///
/// Defaults favour short, near-deterministic completions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationOptions {
    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Nucleus sampling cutoff
    pub top_p: f64,

    /// Penalty applied to repeated tokens
    pub repeat_penalty: f64,

    /// Context window size in tokens
    pub context_window: u32,

    /// Inference threads requested from the service
    pub thread_count: u32,

    /// Ask the service to constrain output to JSON
    pub json_format: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 120,
            temperature: 0.2,
            top_k: 30,
            top_p: 0.9,
            repeat_penalty: 1.1,
            context_window: 1024,
            thread_count: 8,
            json_format: true,
        }
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (waybill-llm)
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate text completion
    fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Identifier of the model requests are sent to
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let options = GenerationOptions::default();
        assert_eq!(options.max_tokens, 120);
        assert_eq!(options.top_k, 30);
        assert_eq!(options.context_window, 1024);
        assert_eq!(options.thread_count, 8);
        assert!((options.temperature - 0.2).abs() < f64::EPSILON);
        assert!(options.json_format);
    }
}
