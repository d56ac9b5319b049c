//! Waybill LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `waybill-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing, with optional latency
//! - `OllamaProvider`: Ollama-compatible HTTP text-generation service
//!
//! # Examples
//!
//! ```
//! use waybill_domain::{GenerationOptions, LlmProvider};
//! use waybill_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("[]");
//! let result = provider.generate("prompt", &GenerationOptions::default()).await.unwrap();
//! assert_eq!(result, "[]");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use waybill_domain::{GenerationOptions, LlmProvider};

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(LlmError),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// response is chosen by the longest registered key contained in the prompt,
/// falling back to the default response.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<AtomicUsize>,
    delay: Option<Duration>,
    model: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            delay: None,
            model: "mock".to_string(),
        }
    }

    /// Delay every response, to exercise timeout handling
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Respond with `response` whenever the prompt contains `key`
    pub fn add_response(&self, key: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(key.into(), MockReply::Text(response.into()));
        }
    }

    /// Fail with `error` whenever the prompt contains `key`
    pub fn add_error(&self, key: impl Into<String>, error: LlmError) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(key.into(), MockReply::Fail(error));
        }
    }

    /// Fail every request that has no registered response
    pub fn failing(error: LlmError) -> Self {
        let provider = Self::new(String::new());
        provider.add_error(String::new(), error);
        provider
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        let responses = match self.responses.lock() {
            Ok(responses) => responses,
            Err(_) => return MockReply::Fail(LlmError::Other("mock state poisoned".to_string())),
        };

        // Longest matching key wins so that the empty catch-all key loses to
        // any specific one.
        responses
            .iter()
            .filter(|(key, _)| prompt.contains(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply_for(prompt);
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::Fail(error) => Err(error),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GenerationOptions {
        GenerationOptions::default()
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt", &options()).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("say hello", &options()).await.unwrap(), "world");
        assert_eq!(provider.generate("foo!", &options()).await.unwrap(), "bar");
        assert_eq!(provider.generate("unknown", &options()).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1", &options()).await.unwrap();
        provider.generate("prompt2", &options()).await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.add_error("bad prompt", LlmError::RateLimitExceeded);

        let result = provider.generate("a bad prompt", &options()).await;
        assert_eq!(result.unwrap_err(), LlmError::RateLimitExceeded);
    }

    #[tokio::test]
    async fn test_failing_provider_fails_everything() {
        let provider = MockProvider::failing(LlmError::Communication("down".into()));
        assert!(provider.generate("anything", &options()).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_provider_delay() {
        let provider = MockProvider::new("late").with_delay(Duration::from_millis(50));
        let started = std::time::Instant::now();
        let result = provider.generate("p", &options()).await.unwrap();
        assert_eq!(result, "late");
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_count() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test", &options()).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
