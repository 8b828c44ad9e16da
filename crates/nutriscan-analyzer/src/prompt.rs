//! LLM prompts for label analysis and follow-up questions
//!
//! The analysis prompt and the section extractor share the heading constants;
//! the exact spelling (including the trailing colon) is the contract between
//! them.

use crate::sections::{ALLERGENS, HEALTH_IMPLICATIONS, KEY_NUTRIENTS, OVERALL_ASSESSMENT};
use nutriscan_domain::{AnalysisResult, ChatMessage};

/// System message for the label analysis
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a nutrition expert analyzing food labels. \
Provide clear, accurate, and helpful nutritional information.";

/// System message for follow-up questions
pub const FOLLOW_UP_SYSTEM_PROMPT: &str = "You are a helpful AI assistant answering \
follow-up questions about a nutrition label analysis.";

/// Allergen sentence the model is told to use when the label lists none
pub const NO_ALLERGENS_SENTENCE: &str = "None explicitly listed in the label text.";

/// Builds the analysis prompt around the OCR text
pub struct AnalysisPrompt<'a> {
    extracted_text: &'a str,
}

impl<'a> AnalysisPrompt<'a> {
    /// Create a new prompt for the given OCR text
    pub fn new(extracted_text: &'a str) -> Self {
        Self { extracted_text }
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Format specification
        prompt.push_str(
            "Analyze the following nutrition label text and provide a detailed breakdown of the \
nutritional information. Format your response using the following exact headings, each \
followed by a colon and two newline characters, and then the information:\n\n",
        );

        // 2. One block per heading, in the order the parser expects them
        prompt.push_str(&format!(
            "{}\n\n[List each nutrient with its value and unit on a new line, e.g. \"Total Fat: 10g\", \
\"Sodium: 200mg\", \"Vitamin C: 50mg\". Use only the units g, mg, mcg, µg or %. DO NOT include \
Calories in this list.]\n\n",
            KEY_NUTRIENTS
        ));
        prompt.push_str(&format!(
            "{}\n\n[List key health impacts as bullet points, one per line, starting with '- '. \
Use double asterisks (**) for terms or phrases that should be bold.]\n\n",
            HEALTH_IMPLICATIONS
        ));
        prompt.push_str(&format!(
            "{}\n\n[List any allergens present as bullet points, one per line, starting with '- '. \
If no allergens are explicitly listed, state \"{}\"]\n\n",
            ALLERGENS, NO_ALLERGENS_SENTENCE
        ));
        prompt.push_str(&format!(
            "{}\n\n[Provide a summary paragraph]\n\n",
            OVERALL_ASSESSMENT
        ));

        // 3. The text to analyze
        prompt.push_str("Nutrition label text:\n");
        prompt.push_str(self.extracted_text);
        prompt.push_str("\n\n");

        // 4. Reminder
        prompt.push_str(
            "Please ensure each section is clearly labeled with the exact headings provided and \
is formatted consistently as described.",
        );

        prompt
    }
}

/// Builds a follow-up prompt from the analysis and the conversation so far
pub struct FollowUpPrompt<'a> {
    extracted_text: &'a str,
    analysis: &'a AnalysisResult,
    history: &'a [ChatMessage],
    question: &'a str,
}

impl<'a> FollowUpPrompt<'a> {
    /// Create a new follow-up prompt
    ///
    /// `history` holds the turns before `question`.
    pub fn new(
        extracted_text: &'a str,
        analysis: &'a AnalysisResult,
        history: &'a [ChatMessage],
        question: &'a str,
    ) -> Self {
        Self {
            extracted_text,
            analysis,
            history,
            question,
        }
    }

    /// Serialize the label text, the analysis and the chat history
    pub fn context(&self) -> String {
        let nutrients = self
            .analysis
            .nutrients
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let history = self
            .history
            .iter()
            .map(|msg| format!("{}: {}", msg.sender.label(), msg.text))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Initial Nutrition Label Text: {}\n\n\
Initial Analysis:\n\
Key Nutrients: {}\n\
Health Implications: {}\n\
Allergens: {}\n\
Overall Assessment: {}\n\n\
Chat History:\n{}",
            self.extracted_text,
            nutrients,
            self.analysis.health_implications.join("\n"),
            self.analysis.allergens.join(", "),
            self.analysis.overall_assessment,
            history
        )
    }

    /// Build the complete follow-up prompt
    pub fn build(&self) -> String {
        format!(
            "Based on the following nutrition label analysis and chat history, answer the user's \
follow-up question:\n\n{}\n\nUser Question: {}\n\nAI Response:",
            self.context(),
            self.question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriscan_domain::NutrientEntry;

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            nutrients: vec![
                NutrientEntry::new("Total Fat", 10.0, "g"),
                NutrientEntry::new("Sodium", 200.0, "mg"),
            ],
            health_implications: vec!["High in **sodium**".to_string(), "Low fiber".to_string()],
            allergens: vec!["Peanuts".to_string(), "Soy".to_string()],
            overall_assessment: "Eat sparingly.".to_string(),
            citations: vec!["https://example.org".to_string()],
        }
    }

    #[test]
    fn test_analysis_prompt_includes_headings_in_order() {
        let prompt = AnalysisPrompt::new("Sodium 200mg").build();
        let positions: Vec<usize> = [KEY_NUTRIENTS, HEALTH_IMPLICATIONS, ALLERGENS, OVERALL_ASSESSMENT]
            .iter()
            .map(|h| prompt.find(h).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_analysis_prompt_includes_text_and_rules() {
        let prompt = AnalysisPrompt::new("NUTRITION FACTS Serving size 30g").build();
        assert!(prompt.contains("Nutrition label text:\nNUTRITION FACTS Serving size 30g"));
        assert!(prompt.contains("DO NOT include Calories"));
        assert!(prompt.contains(NO_ALLERGENS_SENTENCE));
        assert!(prompt.contains("double asterisks (**)"));
    }

    #[test]
    fn test_follow_up_context_serialization() {
        let analysis = sample_analysis();
        let history = vec![
            ChatMessage::ai("Do you have any follow up questions?"),
            ChatMessage::user("Is it vegan?"),
            ChatMessage::ai("No."),
        ];
        let prompt = FollowUpPrompt::new("label text", &analysis, &history, "Why?");
        let context = prompt.context();

        assert!(context.starts_with("Initial Nutrition Label Text: label text\n\nInitial Analysis:\n"));
        assert!(context.contains("Key Nutrients: Total Fat: 10g, Sodium: 200mg\n"));
        assert!(context.contains("Health Implications: High in **sodium**\nLow fiber\n"));
        assert!(context.contains("Allergens: Peanuts, Soy\n"));
        assert!(context.contains("Overall Assessment: Eat sparingly.\n\n"));
        assert!(context.ends_with(
            "Chat History:\nAI: Do you have any follow up questions?\nUser: Is it vegan?\nAI: No."
        ));
    }

    #[test]
    fn test_follow_up_prompt_wraps_question() {
        let analysis = AnalysisResult::default();
        let prompt = FollowUpPrompt::new("", &analysis, &[], "How much sugar?").build();
        assert!(prompt.starts_with("Based on the following nutrition label analysis"));
        assert!(prompt.contains("\n\nUser Question: How much sugar?\n\nAI Response:"));
        assert!(prompt.contains("Key Nutrients: \n"));
    }
}
