//! Error types for the Analyzer

use thiserror::Error;

/// Errors that can occur while requesting an analysis or a follow-up answer
///
/// None of these originate in the section extractor or the analysis builder;
/// those are total and degrade to empty fields instead.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// LLM provider error
    #[error("{0}")]
    Llm(String),

    /// Nothing to analyze
    #[error("No text to analyze")]
    EmptyText,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// The provider did not answer in time
    #[error("Analysis timed out")]
    Timeout,

    /// Another analysis is still in flight
    #[error("An analysis is already in progress")]
    Busy,

    /// The API answered without an assistant message
    #[error("No analysis data received")]
    NoAnalysisData,

    /// Follow-up question was blank
    #[error("Question is empty")]
    EmptyQuestion,
}
