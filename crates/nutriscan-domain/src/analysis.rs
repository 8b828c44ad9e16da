//! Analysis module - the typed result of a nutrition label analysis

use std::fmt;

/// Phrase the model uses when a label lists no allergens
const NO_ALLERGEN_NOTICE: &str = "none explicitly listed";

/// A single nutrient read from the "Key Nutrients" section
///
/// The unit is kept exactly as the model wrote it (`mg` and `MG` are both
/// accepted and stored as captured).
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientEntry {
    /// Nutrient name, trimmed with inner whitespace collapsed
    pub name: String,

    /// Amount as written on the label
    pub value: f64,

    /// One of `g`, `%`, `mg`, `mcg`, `µg` (any case)
    pub unit: String,
}

impl NutrientEntry {
    /// Create a new nutrient entry
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }

    /// Amount with its unit, e.g. `10g` or `2.5mg`
    ///
    /// # Examples
    ///
    /// ```
    /// use nutriscan_domain::NutrientEntry;
    ///
    /// let fat = NutrientEntry::new("Total Fat", 10.0, "g");
    /// assert_eq!(fat.display_amount(), "10g");
    /// ```
    pub fn display_amount(&self) -> String {
        format!("{}{}", self.value, self.unit)
    }
}

impl fmt::Display for NutrientEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.name, self.value, self.unit)
    }
}

/// The structured analysis of one nutrition label
///
/// Every list defaults to empty and the assessment to the empty string, so a
/// missing section never shows up as an absent field. A new value is built for
/// every analysis; re-analysis replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    /// Nutrients in the order they appear in the response
    pub nutrients: Vec<NutrientEntry>,

    /// Health implication bullets, inline markup preserved
    pub health_implications: Vec<String>,

    /// Allergen bullets, inline markup preserved
    pub allergens: Vec<String>,

    /// Free-text summary paragraph
    pub overall_assessment: String,

    /// Source URLs reported by the LLM API
    pub citations: Vec<String>,
}

impl AnalysisResult {
    /// True when no section produced any content
    pub fn is_empty(&self) -> bool {
        self.nutrients.is_empty()
            && self.health_implications.is_empty()
            && self.allergens.is_empty()
            && self.overall_assessment.is_empty()
            && self.citations.is_empty()
    }

    /// Sum of all nutrient values, the denominator for chart proportions
    pub fn total_nutrient_amount(&self) -> f64 {
        self.nutrients.iter().map(|n| n.value).sum()
    }

    /// True when at least one allergen entry names an actual allergen
    pub fn has_alert_allergens(&self) -> bool {
        self.allergens.iter().any(|a| !is_no_allergen_notice(a))
    }
}

/// Whether an allergen entry is the "none explicitly listed" notice
///
/// # Examples
///
/// ```
/// use nutriscan_domain::is_no_allergen_notice;
///
/// assert!(is_no_allergen_notice("None explicitly listed in the label text."));
/// assert!(!is_no_allergen_notice("Peanuts"));
/// ```
pub fn is_no_allergen_notice(allergen: &str) -> bool {
    allergen.to_lowercase().contains(NO_ALLERGEN_NOTICE)
}
