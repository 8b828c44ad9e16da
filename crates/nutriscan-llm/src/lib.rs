//! NutriScan LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `nutriscan-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `PerplexityProvider`: Hosted chat-completions API with citations
//!
//! # Examples
//!
//! ```
//! use nutriscan_domain::traits::LlmProvider;
//! use nutriscan_domain::CompletionRequest;
//! use nutriscan_llm::MockProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = CompletionRequest::new("system", "test prompt");
//! let completion = provider.complete(&request).await.unwrap();
//! assert_eq!(completion.content.as_deref(), Some("Hello from LLM!"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod perplexity;

use nutriscan_domain::traits::LlmProvider as LlmProviderTrait;
use nutriscan_domain::{Completion, CompletionRequest};
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use perplexity::PerplexityProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The API answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message taken from the error body
        message: String,
    },

    /// Body was not the expected JSON shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider could not be configured (bad key, bad endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether a retry has a chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Communication(_) | LlmError::RateLimitExceeded => true,
            LlmError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Completion(Completion),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen by the first registered needle contained in the
/// request prompt; requests matching nothing get the default completion.
///
/// # Examples
///
/// ```
/// use nutriscan_domain::traits::LlmProvider;
/// use nutriscan_domain::CompletionRequest;
/// use nutriscan_llm::MockProvider;
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("sugar", "Sugar answer");
///
/// let request = CompletionRequest::new("system", "How much sugar?");
/// let reply = provider.complete(&request).await.unwrap();
/// assert_eq!(reply.content.as_deref(), Some("Sugar answer"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_completion: Completion,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider answering every prompt with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_completion(Completion::text(response))
    }

    /// Create a new MockProvider answering every prompt with `completion`
    pub fn with_completion(completion: Completion) -> Self {
        Self {
            default_completion: completion,
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Answer prompts containing `needle` with `response`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.add_completion(needle, Completion::text(response));
    }

    /// Answer prompts containing `needle` with a full completion
    pub fn add_completion(&mut self, needle: impl Into<String>, completion: Completion) {
        lock(&self.responses).push((needle.into(), MockReply::Completion(completion)));
    }

    /// Fail prompts containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.responses).push((needle.into(), MockReply::Error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// The most recent request received
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.last_request).clone()
    }

    fn reply_for(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        *lock(&self.call_count) += 1;
        *lock(&self.last_request) = Some(request.clone());

        let responses = lock(&self.responses);
        let matched = responses
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()));

        match matched {
            Some((_, MockReply::Error)) => Err(LlmError::Other("Mock error".to_string())),
            Some((_, MockReply::Completion(completion))) => Ok(completion.clone()),
            None => Ok(self.default_completion.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send {
        ready(self.reply_for(request))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
