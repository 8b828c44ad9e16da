//! NutriScan Domain Layer
//!
//! This crate contains the domain model shared by every other NutriScan crate.
//! It has no external dependencies and defines the typed analysis record, the
//! chat turn types, and the trait interfaces for the external collaborators.
//!
//! ## Key Concepts
//!
//! - **NutrientEntry**: a `(name, value, unit)` triple read from one nutrient line
//! - **AnalysisResult**: the aggregate output of a label analysis
//! - **Completion**: the assistant message and citation list returned by an LLM
//! - **Collaborators**: `LlmProvider` and `TextRecognizer` implementations live
//!   in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod chat;
pub mod completion;
pub mod traits;

// Re-exports for convenience
pub use analysis::{is_no_allergen_notice, AnalysisResult, NutrientEntry};
pub use chat::{ChatMessage, Sender};
pub use completion::{Completion, CompletionRequest};
