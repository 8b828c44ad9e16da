//! NutriScan Analyzer
//!
//! Turns the OCR text of a nutrition label into a typed analysis using a
//! hosted LLM, and answers follow-up questions about the result.
//!
//! # Architecture
//!
//! ```text
//! OCR text → prompt → LLM → reply text → sections → AnalysisResult
//!                                                        ↓
//!                                    follow-up prompt ← chat
//! ```
//!
//! The parsing half (`sections` and `builder`) is synchronous, pure and total:
//! any reply, however malformed, yields a valid and possibly empty
//! `AnalysisResult`. Only request-level failures surface as errors.
//!
//! # Example Usage
//!
//! ```no_run
//! use nutriscan_analyzer::{Analyzer, AnalyzerConfig};
//! use nutriscan_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("Key Nutrients:\n\nSodium: 200mg");
//! let analyzer = Analyzer::new(llm, AnalyzerConfig::default());
//!
//! let analysis = analyzer.analyze("Nutrition Facts Sodium 200mg").await?;
//! println!("{} nutrients", analysis.nutrients.len());
//!
//! let mut chat = analyzer.follow_up("Nutrition Facts Sodium 200mg", analysis);
//! let answer = chat.ask("Is that a lot of sodium?").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod builder;
mod chat;
mod config;
mod error;
pub mod prompt;
pub mod sections;


pub use analyzer::Analyzer;
pub use builder::{build_analysis, parse_analysis, parse_list, parse_nutrient_line, parse_nutrients};
pub use chat::{FollowUpChat, CHAT_GREETING, NO_REPLY_FALLBACK};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use sections::{extract_sections, SectionMap, SECTION_HEADINGS};
