//! Completion module - request and reply shapes for the hosted LLM

/// A single-turn chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message setting the assistant's role
    pub system: String,

    /// User message carrying the full prompt
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with the given system message and prompt
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// The assistant reply of a successful completion call
///
/// `content` is `None` when the API answered successfully but without an
/// assistant message; callers decide whether that is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Assistant message text
    pub content: Option<String>,

    /// Citation URLs attached by the API
    pub citations: Vec<String>,
}

impl Completion {
    /// A completion carrying only a message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            citations: Vec::new(),
        }
    }

    /// Attach citation URLs
    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }
}
