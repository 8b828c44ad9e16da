//! Core Analyzer implementation

use crate::builder::parse_analysis;
use crate::chat::FollowUpChat;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::prompt::{AnalysisPrompt, ANALYSIS_SYSTEM_PROMPT};
use nutriscan_domain::traits::LlmProvider;
use nutriscan_domain::{AnalysisResult, CompletionRequest};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Analyzer turns OCR text into a structured nutrition analysis
pub struct Analyzer<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: AnalyzerConfig,
    busy: AtomicBool,
}

impl<L> Analyzer<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Analyzer
    pub fn new(llm_provider: L, config: AnalyzerConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
            busy: AtomicBool::new(false),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether an analysis is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Analyze OCR text from a nutrition label
    ///
    /// Only one analysis runs at a time; a second call while one is in flight
    /// fails with `AnalyzerError::Busy`. Every successful call returns a new
    /// result.
    pub async fn analyze(&self, extracted_text: &str) -> Result<AnalysisResult, AnalyzerError> {
        if extracted_text.trim().is_empty() {
            return Err(AnalyzerError::EmptyText);
        }

        let text_length = extracted_text.chars().count();
        if text_length > self.config.max_text_length {
            return Err(AnalyzerError::TextTooLong(
                text_length,
                self.config.max_text_length,
            ));
        }

        let _guard = BusyGuard::acquire(&self.busy).ok_or(AnalyzerError::Busy)?;
        let start_time = Instant::now();

        info!("Starting analysis, text length {}", text_length);

        let prompt = AnalysisPrompt::new(extracted_text).build();
        debug!("Prompt length: {} chars", prompt.len());

        let request = CompletionRequest::new(ANALYSIS_SYSTEM_PROMPT, prompt)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.analysis_max_tokens);

        // Call LLM with timeout
        let completion = timeout(
            self.config.request_timeout(),
            self.llm_provider.complete(&request),
        )
        .await
        .map_err(|_| AnalyzerError::Timeout)?
        .map_err(|e| {
            warn!("Analysis request failed: {}", e);
            AnalyzerError::Llm(e.to_string())
        })?;

        let Some(content) = completion.content else {
            warn!("Unexpected API response format: no assistant message");
            return Err(AnalyzerError::NoAnalysisData);
        };

        debug!("LLM response length: {} chars", content.len());

        let analysis = parse_analysis(&content, completion.citations);

        info!(
            "Analysis complete in {} ms: {} nutrients, {} implications, {} allergens, {} citations",
            start_time.elapsed().as_millis(),
            analysis.nutrients.len(),
            analysis.health_implications.len(),
            analysis.allergens.len(),
            analysis.citations.len()
        );

        Ok(analysis)
    }

    /// Start a follow-up conversation about `analysis`
    pub fn follow_up(
        &self,
        extracted_text: impl Into<String>,
        analysis: AnalysisResult,
    ) -> FollowUpChat<L> {
        FollowUpChat::new(
            Arc::clone(&self.llm_provider),
            self.config.clone(),
            extracted_text,
            analysis,
        )
    }
}

/// Holds the busy flag for the duration of one analysis
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
