//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis core and the
//! services it talks to. Implementations live in other crates.

use crate::{Completion, CompletionRequest};
use std::future::Future;
use std::path::Path;

/// Trait for hosted LLM chat completions
///
/// Implemented by the infrastructure layer (nutriscan-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send one completion request and return the assistant reply
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send;
}

/// Trait for optical character recognition
///
/// Implemented by the application layer (nutriscan-cli)
pub trait TextRecognizer {
    /// Error type for recognition
    type Error;

    /// Read all text from the image at `image`; the result may be empty or noisy
    fn recognize(&self, image: &Path) -> Result<String, Self::Error>;
}
