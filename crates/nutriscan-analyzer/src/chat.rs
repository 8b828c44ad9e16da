//! Follow-up question answering against a finished analysis

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::prompt::{FollowUpPrompt, FOLLOW_UP_SYSTEM_PROMPT};
use nutriscan_domain::traits::LlmProvider;
use nutriscan_domain::{AnalysisResult, ChatMessage, CompletionRequest};
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// First AI turn of every conversation
pub const CHAT_GREETING: &str = "Do you have any follow up questions?";

/// Reply shown when the API answers without a message
pub const NO_REPLY_FALLBACK: &str = "No response from AI.";

/// A follow-up conversation about one analysis
///
/// Replies are kept as raw text; they are never run through the parser.
pub struct FollowUpChat<L>
where
    L: LlmProvider,
{
    llm: Arc<L>,
    config: AnalyzerConfig,
    extracted_text: String,
    analysis: AnalysisResult,
    messages: Vec<ChatMessage>,
}

impl<L> FollowUpChat<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Start a conversation seeded with the greeting
    pub fn new(
        llm: Arc<L>,
        config: AnalyzerConfig,
        extracted_text: impl Into<String>,
        analysis: AnalysisResult,
    ) -> Self {
        Self {
            llm,
            config,
            extracted_text: extracted_text.into(),
            analysis,
            messages: vec![ChatMessage::ai(CHAT_GREETING)],
        }
    }

    /// All turns so far, greeting first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The analysis this conversation is about
    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    /// Ask a question and return the reply
    ///
    /// The question is recorded before the request is sent, so it stays in the
    /// history even when the request fails.
    pub async fn ask(&mut self, question: &str) -> Result<String, AnalyzerError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AnalyzerError::EmptyQuestion);
        }

        let prompt = FollowUpPrompt::new(
            &self.extracted_text,
            &self.analysis,
            &self.messages,
            question,
        )
        .build();
        self.messages.push(ChatMessage::user(question));

        debug!("Follow-up prompt length: {} chars", prompt.len());

        let request = CompletionRequest::new(FOLLOW_UP_SYSTEM_PROMPT, prompt)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.chat_max_tokens);

        let completion = timeout(self.config.request_timeout(), self.llm.complete(&request))
            .await
            .map_err(|_| AnalyzerError::Timeout)?
            .map_err(|e| {
                warn!("Follow-up question failed: {}", e);
                AnalyzerError::Llm(e.to_string())
            })?;

        let reply = completion
            .content
            .unwrap_or_else(|| NO_REPLY_FALLBACK.to_string());
        self.messages.push(ChatMessage::ai(reply.clone()));

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriscan_domain::{Completion, NutrientEntry, Sender};
    use nutriscan_llm::MockProvider;

    fn chat_with(provider: MockProvider) -> FollowUpChat<MockProvider> {
        let analysis = AnalysisResult {
            nutrients: vec![NutrientEntry::new("Sugars", 12.0, "g")],
            ..Default::default()
        };
        FollowUpChat::new(
            Arc::new(provider),
            AnalyzerConfig::default(),
            "Sugars 12g",
            analysis,
        )
    }

    #[test]
    fn test_starts_with_greeting() {
        let chat = chat_with(MockProvider::default());
        assert_eq!(chat.messages(), &[ChatMessage::ai(CHAT_GREETING)]);
    }

    #[tokio::test]
    async fn test_ask_records_both_turns() {
        let provider = MockProvider::new("About 3 teaspoons.");
        let mut chat = chat_with(provider.clone());

        let reply = chat.ask("  How much sugar is that?  ").await.unwrap();
        assert_eq!(reply, "About 3 teaspoons.");

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], ChatMessage::user("How much sugar is that?"));
        assert_eq!(messages[2].sender, Sender::Ai);

        let request = provider.last_request().unwrap();
        assert_eq!(request.system, FOLLOW_UP_SYSTEM_PROMPT);
        assert_eq!(request.max_tokens, 500);
        assert!(request.prompt.contains("Key Nutrients: Sugars: 12g"));
        assert!(request.prompt.contains("User Question: How much sugar is that?"));
    }

    #[tokio::test]
    async fn test_history_is_sent_with_later_questions() {
        let provider = MockProvider::new("Yes.");
        let mut chat = chat_with(provider.clone());

        chat.ask("Is it sweet?").await.unwrap();
        chat.ask("Very sweet?").await.unwrap();

        let prompt = provider.last_request().unwrap().prompt;
        assert!(prompt.contains("Chat History:\nAI: Do you have any follow up questions?\nUser: Is it sweet?\nAI: Yes.\n\nUser Question: Very sweet?"));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let provider = MockProvider::default();
        let mut chat = chat_with(provider.clone());

        let result = chat.ask("   ").await;
        assert!(matches!(result, Err(AnalyzerError::EmptyQuestion)));
        assert_eq!(provider.call_count(), 0);
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_content_uses_fallback() {
        let mut chat = chat_with(MockProvider::with_completion(Completion::default()));

        let reply = chat.ask("Anything?").await.unwrap();
        assert_eq!(reply, NO_REPLY_FALLBACK);
        assert_eq!(chat.messages().last().unwrap().text, NO_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn test_failed_request_keeps_question() {
        let mut provider = MockProvider::default();
        provider.add_error("fail please");
        let mut chat = chat_with(provider);

        let result = chat.ask("fail please").await;
        assert!(matches!(result, Err(AnalyzerError::Llm(_))));
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1], ChatMessage::user("fail please"));
    }
}
