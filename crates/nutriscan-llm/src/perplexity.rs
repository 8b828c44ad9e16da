//! Perplexity Provider Implementation
//!
//! Integration with the hosted Perplexity chat-completions API. Besides the
//! assistant message, the API returns a list of citation URLs which are
//! passed through untouched.
//!
//! # Features
//!
//! - Async HTTP communication with bearer authentication
//! - Configurable endpoint, model and timeout
//! - Retry logic with exponential backoff for transient failures
//!
//! # Examples
//!
//! ```no_run
//! use nutriscan_llm::PerplexityProvider;
//!
//! let provider = PerplexityProvider::new("https://api.perplexity.ai", "sonar", "pplx-key")
//!     .unwrap()
//!     .with_max_retries(2);
//! ```

use crate::LlmError;
use nutriscan_domain::traits::LlmProvider as LlmProviderTrait;
use nutriscan_domain::{Completion, CompletionRequest};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Perplexity API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai";

/// Default model
pub const DEFAULT_MODEL: &str = "sonar";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Perplexity API provider
pub struct PerplexityProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Successful response from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl PerplexityProvider {
    /// Create a new Perplexity provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.perplexity.ai")
    /// - `model`: Model to use (e.g., "sonar")
    /// - `api_key`: Bearer token
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the key or model is blank or the
    /// HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        let model = model.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration(
                "Perplexity API key is not configured".to_string(),
            ));
        }
        if model.trim().is_empty() {
            return Err(LlmError::Configuration("missing model name".to_string()));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model,
            api_key: api_key.trim().to_string(),
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider against the public endpoint with the default model
    pub fn default_endpoint(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API cannot be reached after all attempts
    /// - The API answers with a non-success status
    /// - The body is not JSON of the expected shape
    pub async fn chat(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                RequestMessage {
                    role: "system",
                    content: &request.system,
                },
                RequestMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let outcome = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .timeout(self.timeout)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(text) => {
                            debug!("Perplexity responded with {} ({} bytes)", status, text.len());
                            interpret_response(status, &text)
                        }
                        Err(e) => Err(LlmError::Communication(format!(
                            "Failed to read response body: {}",
                            e
                        ))),
                    }
                }
                Err(e) => Err(LlmError::Communication(format!("Request failed: {}", e))),
            };

            match outcome {
                Err(e) if e.is_transient() => {
                    warn!("Perplexity request attempt {} failed: {}", attempts + 1, e);
                    last_error = Some(e);
                }
                other => return other,
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for PerplexityProvider {
    type Error = LlmError;

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send {
        self.chat(request)
    }
}

/// Turn a raw HTTP status and body into a completion or an error
///
/// The body is parsed before the status is inspected so that error bodies can
/// contribute their `error.message` to the reported failure.
pub(crate) fn interpret_response(status: StatusCode, body: &str) -> Result<Completion, LlmError> {
    let data: Value = serde_json::from_str(body).map_err(|_| {
        warn!("Failed to parse API response: {}", body);
        LlmError::InvalidResponse("Invalid response from server".to_string())
    })?;

    if !status.is_success() {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: error_message(&data).unwrap_or_else(|| "Request failed".to_string()),
        });
    }

    let parsed: ChatCompletionResponse = serde_json::from_value(data)
        .map_err(|e| LlmError::InvalidResponse(format!("Unexpected response format: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty());

    Ok(Completion {
        content,
        citations: parsed.citations,
    })
}

/// `error.message`, or `error` itself when it is a plain string
fn error_message(data: &Value) -> Option<String> {
    let error = data.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
}
