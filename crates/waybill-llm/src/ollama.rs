//! Ollama Provider Implementation
//!
//! Talks to an Ollama-compatible text-generation service over HTTP.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/generate` endpoint
//! - Generation parameters forwarded as Ollama `options`
//! - JSON output mode
//! - Health check and model listing through `/api/tags`
//!
//! Requests are attempted once. Callers that need a fallback decide it
//! themselves; this client never retries.
//!
//! # Examples
//!
//! ```no_run
//! use waybill_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.2:3b");
//! ```

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use waybill_domain::{GenerationOptions, LlmProvider};

use crate::LlmError;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default client-side timeout for requests (30 seconds)
///
/// Extraction applies its own, shorter deadline on top of this one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ollama API provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

/// Sampling options in Ollama's naming
#[derive(Serialize, Debug, PartialEq)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f64,
    top_k: u32,
    top_p: f64,
    repeat_penalty: f64,
    num_ctx: u32,
    num_thread: u32,
}

impl From<&GenerationOptions> for OllamaOptions {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            num_predict: options.max_tokens,
            temperature: options.temperature,
            top_k: options.top_k,
            top_p: options.top_p,
            repeat_penalty: options.repeat_penalty,
            num_ctx: options.context_window,
            num_thread: options.thread_count,
        }
    }
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response from Ollama tags API
#[derive(Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.2:3b")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider whose HTTP client gives up after `timeout`
    pub fn with_timeout(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        // Building only fails when the TLS backend cannot initialise; a
        // default client still works for plain HTTP endpoints.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        }
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the service is not running or the request times out
    /// - the model is not installed (HTTP 404)
    /// - the service is overloaded (HTTP 429)
    /// - the response body is not a generate response
    pub async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: options.json_format.then_some("json"),
            options: OllamaOptions::from(options),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                }
            })?;

        Ok(body.response)
    }

    /// Check that the service answers
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.list_models().await.map(|_| ())
    }

    /// List the models installed on the service
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.endpoint);
        let response = self.client.get(&url).send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Communication(format!("HTTP {}", status)));
        }

        let tags = response
            .json::<OllamaTagsResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model appears in the service's model list
    ///
    /// A bare model name also matches its `:latest` tag.
    pub async fn has_model(&self) -> Result<bool, LlmError> {
        let models = self.list_models().await?;
        let latest = format!("{}:latest", self.model);
        Ok(models.iter().any(|m| *m == self.model || *m == latest))
    }
}

fn map_transport_error(error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Communication(format!("Request failed: {}", error))
    }
}

impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        self.generate_text(prompt, options)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
