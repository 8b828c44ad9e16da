//! Output formatting for the CLI.

use crate::config::{OutputFormat, Theme};
use crate::error::Result;
use colored::*;
use nutriscan_domain::{is_no_allergen_notice, AnalysisResult};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

/// `**text**` markers the model uses for emphasis
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Width of a full-share bar
const BAR_WIDTH: usize = 24;

/// Kinds of styled text.
#[derive(Debug, Clone, Copy)]
enum Role {
    Heading,
    Alert,
    Notice,
    Success,
    Error,
    Warning,
    Muted,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
    theme: Theme,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool, theme: Theme) -> Self {
        Self {
            format,
            color_enabled,
            theme,
        }
    }

    /// Format an analysis result.
    pub fn format_analysis(&self, analysis: &AnalysisResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_analysis_json(analysis),
            OutputFormat::Table => Ok(self.format_analysis_table(analysis)),
            OutputFormat::Quiet => Ok(self.format_analysis_quiet(analysis)),
        }
    }

    /// Format an analysis as JSON.
    fn format_analysis_json(&self, analysis: &AnalysisResult) -> Result<String> {
        let nutrients: Vec<serde_json::Value> = analysis
            .nutrients
            .iter()
            .map(|n| {
                serde_json::json!({
                    "name": n.name,
                    "value": n.value,
                    "unit": n.unit
                })
            })
            .collect();

        let value = serde_json::json!({
            "nutrients": nutrients,
            "health_implications": analysis.health_implications,
            "allergens": analysis.allergens,
            "overall_assessment": analysis.overall_assessment,
            "citations": analysis.citations
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Format an analysis as tables and lists.
    fn format_analysis_table(&self, analysis: &AnalysisResult) -> String {
        let mut blocks = Vec::new();

        blocks.push(format!(
            "{}\n{}",
            self.colorize("Nutrient Breakdown", Role::Heading),
            self.nutrient_table(analysis)
        ));

        if !analysis.health_implications.is_empty() {
            let lines: Vec<String> = analysis
                .health_implications
                .iter()
                .map(|item| format!("  • {}", self.render_emphasis(item)))
                .collect();
            blocks.push(format!(
                "{}\n{}",
                self.colorize("Health Implications", Role::Heading),
                lines.join("\n")
            ));
        }

        if !analysis.allergens.is_empty() {
            let tags: Vec<String> = analysis
                .allergens
                .iter()
                .map(|allergen| self.allergen_tag(allergen))
                .collect();
            let heading = if analysis.has_alert_allergens() {
                self.colorize("⚠ Allergens", Role::Alert)
            } else {
                self.colorize("Allergens", Role::Heading)
            };
            blocks.push(format!("{}\n  {}", heading, tags.join("  ")));
        }

        if !analysis.overall_assessment.is_empty() {
            blocks.push(format!(
                "{}\n  {}",
                self.colorize("Overall Assessment", Role::Heading),
                self.render_emphasis(&analysis.overall_assessment)
            ));
        }

        if !analysis.citations.is_empty() {
            let lines: Vec<String> = analysis
                .citations
                .iter()
                .enumerate()
                .map(|(i, url)| format!("  {}. {}", i + 1, self.colorize(url, Role::Muted)))
                .collect();
            blocks.push(format!(
                "{}\n{}",
                self.colorize("Citations", Role::Heading),
                lines.join("\n")
            ));
        }

        blocks.join("\n\n")
    }

    /// Nutrient table with each entry's share of the listed total.
    fn nutrient_table(&self, analysis: &AnalysisResult) -> String {
        if analysis.nutrients.is_empty() {
            return self.colorize("No nutrient data available for chart.", Role::Warning);
        }

        let total = analysis.total_nutrient_amount();
        let mut builder = Builder::default();
        builder.push_record(["Nutrient", "Amount", "Share", ""]);

        for nutrient in &analysis.nutrients {
            let share = nutrient_share(nutrient.value, total);
            builder.push_record([
                nutrient.name.clone(),
                nutrient.display_amount(),
                format!("{:.1}%", share * 100.0),
                share_bar(share),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::new(1..3)).with(Alignment::right()));

        table.to_string()
    }

    /// Format an analysis in quiet mode (one nutrient per line).
    fn format_analysis_quiet(&self, analysis: &AnalysisResult) -> String {
        let lines: Vec<String> = analysis
            .nutrients
            .iter()
            .map(|n| format!("{}\t{}\t{}", n.name, n.value, n.unit))
            .collect();
        lines.join("\n")
    }

    fn allergen_tag(&self, allergen: &str) -> String {
        let text = self.render_emphasis(allergen);
        if is_no_allergen_notice(allergen) {
            self.colorize(&format!("ℹ {}", text), Role::Notice)
        } else {
            self.colorize(&format!("[{}]", text), Role::Alert)
        }
    }

    /// Turn `**bold**` markers into terminal emphasis, or drop them without color.
    pub fn render_emphasis(&self, text: &str) -> String {
        BOLD_RE
            .replace_all(text, |caps: &Captures| {
                if self.color_enabled {
                    caps[1].bold().to_string()
                } else {
                    caps[1].to_string()
                }
            })
            .into_owned()
    }

    /// Format an AI reply in the follow-up chat.
    pub fn chat_reply(&self, reply: &str) -> String {
        let label = self.colorize("AI:", Role::Heading);
        let body = reply
            .lines()
            .map(|line| self.render_emphasis(line))
            .collect::<Vec<_>>()
            .join("\n    ");
        format!("{} {}", label, body)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Role::Success)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Role::Error)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Role::Notice)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Role::Warning)
    }

    fn colorize(&self, text: &str, role: Role) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        let styled = text.color(palette(self.theme, role));
        match role {
            Role::Heading => styled.bold().to_string(),
            _ => styled.to_string(),
        }
    }
}

fn palette(theme: Theme, role: Role) -> Color {
    match (theme, role) {
        (Theme::Light, Role::Heading) => Color::Blue,
        (Theme::Dark, Role::Heading) => Color::BrightCyan,
        (Theme::Light, Role::Alert | Role::Error) => Color::Red,
        (Theme::Dark, Role::Alert | Role::Error) => Color::BrightRed,
        (Theme::Light, Role::Notice) => Color::Blue,
        (Theme::Dark, Role::Notice) => Color::BrightBlue,
        (Theme::Light, Role::Success) => Color::Green,
        (Theme::Dark, Role::Success) => Color::BrightGreen,
        (Theme::Light, Role::Warning) => Color::Yellow,
        (Theme::Dark, Role::Warning) => Color::BrightYellow,
        (Theme::Light, Role::Muted) => Color::BrightBlack,
        (Theme::Dark, Role::Muted) => Color::White,
    }
}

/// Fraction of `total` taken by `value`; zero when nothing is listed.
fn nutrient_share(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total
    } else {
        0.0
    }
}

fn share_bar(share: f64) -> String {
    let filled = (share.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}
