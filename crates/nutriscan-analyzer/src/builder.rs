//! Build the typed analysis record from extracted sections

use crate::sections::{
    extract_sections, SectionMap, ALLERGENS, HEALTH_IMPLICATIONS, KEY_NUTRIENTS,
    OVERALL_ASSESSMENT, SECTION_HEADINGS,
};
use nutriscan_domain::{AnalysisResult, NutrientEntry};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// One nutrient line: optional bullet, optional bold name, colon, number, unit,
/// optional parenthesized note. Anything after the unit is ignored.
static NUTRIENT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^-?\s*\*?\*?(.*?)\*?\*?\s*:\s*\*{0,2}\s*([0-9]+(?:\.[0-9]+)?)\s*([g%]|mg|mcg|µg)(?:\s*\(.*?\))?",
    )
    .unwrap()
});

/// Energy is not a nutrient amount and stays out of the nutrient list
const EXCLUDED_NUTRIENT: &str = "calories";

/// Parse a complete analysis reply
///
/// Shorthand for `build_analysis(&extract_sections(text, &SECTION_HEADINGS), citations)`.
///
/// # Examples
///
/// ```
/// use nutriscan_analyzer::parse_analysis;
///
/// let reply = "Key Nutrients:\n\nTotal Fat: 10g\n\nAllergens:\n\n- Peanuts\n- Soy";
/// let analysis = parse_analysis(reply, Vec::new());
/// assert_eq!(analysis.nutrients[0].name, "Total Fat");
/// assert_eq!(analysis.allergens, vec!["Peanuts", "Soy"]);
/// assert!(analysis.overall_assessment.is_empty());
/// ```
pub fn parse_analysis(text: &str, citations: Vec<String>) -> AnalysisResult {
    build_analysis(&extract_sections(text, &SECTION_HEADINGS), citations)
}

/// Turn extracted sections into an `AnalysisResult`
///
/// Missing sections become empty fields; malformed nutrient lines are dropped
/// with a warning. Citations come from the API response, not the text body,
/// and are attached unchanged.
pub fn build_analysis(sections: &SectionMap, citations: Vec<String>) -> AnalysisResult {
    AnalysisResult {
        nutrients: parse_nutrients(sections.content_or_empty(KEY_NUTRIENTS)),
        health_implications: parse_list(sections.content_or_empty(HEALTH_IMPLICATIONS)),
        allergens: parse_list(sections.content_or_empty(ALLERGENS)),
        overall_assessment: sections.content_or_empty(OVERALL_ASSESSMENT).trim().to_string(),
        citations,
    }
}

/// Parse every nutrient line of the "Key Nutrients" section, skipping Calories
pub fn parse_nutrients(section: &str) -> Vec<NutrientEntry> {
    let mut nutrients = Vec::new();

    for line in non_blank_lines(section) {
        match parse_nutrient_line(line) {
            Some(entry) if entry.name.eq_ignore_ascii_case(EXCLUDED_NUTRIENT) => {
                debug!("Skipping calories line: {}", line);
            }
            Some(entry) => nutrients.push(entry),
            None => warn!("Could not parse nutrient line: {}", line),
        }
    }

    nutrients
}

/// Parse a single nutrient line
///
/// Returns `None` when the line does not match, when the unit is not one of
/// `g`, `%`, `mg`, `mcg`, `µg`, or when the value is not a finite number.
pub fn parse_nutrient_line(line: &str) -> Option<NutrientEntry> {
    let caps = NUTRIENT_LINE_RE.captures(line)?;

    let name = caps
        .get(1)?
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        return None;
    }

    let value = caps
        .get(2)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())?;

    Some(NutrientEntry {
        name,
        value,
        unit: caps.get(3)?.as_str().to_string(),
    })
}

/// Parse a bullet section into cleaned lines
///
/// Strips one leading `-` and the whitespace after it; inline markup such as
/// `**bold**` is kept for the renderer.
pub fn parse_list(section: &str) -> Vec<String> {
    non_blank_lines(section)
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('-').unwrap_or(line).trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Lines split on `\n`, `\r\n` or `\r`, blank ones dropped
fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r']).filter(|line| !line.trim().is_empty())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: parsing is total; any text yields a record whose entries respect the invariants
        #[test]
        fn test_parse_never_panics(text in "\\PC*") {
            let result = parse_analysis(&text, Vec::new());
            for n in &result.nutrients {
                prop_assert!(!n.name.is_empty());
                prop_assert_eq!(n.name.trim(), n.name.as_str());
                prop_assert!(n.value.is_finite());
                prop_assert!(!n.name.eq_ignore_ascii_case("calories"));
            }
            prop_assert!(result.health_implications.iter().all(|l| !l.is_empty()));
            prop_assert!(result.allergens.iter().all(|l| !l.is_empty()));
        }

        /// Property: building twice from the same sections gives equal records
        #[test]
        fn test_build_is_pure(body in "[A-Za-z0-9:.\\-*% \n]{0,200}") {
            let text = format!("Key Nutrients:\n\n{}\n\nAllergens:\n\n{}", body, body);
            let sections = extract_sections(&text, &SECTION_HEADINGS);
            prop_assert_eq!(
                build_analysis(&sections, Vec::new()),
                build_analysis(&sections, Vec::new())
            );
        }

        /// Property: well-formed nutrient lines round through the parser unchanged
        #[test]
        fn test_generated_nutrient_lines(
            name in "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,8})?",
            whole in 0u32..5000,
            unit in prop::sample::select(vec!["g", "%", "mg", "mcg", "µg"]),
        ) {
            prop_assume!(!name.eq_ignore_ascii_case("calories"));
            let line = format!("- **{}**: {}{}", name, whole, unit);
            let entry = parse_nutrient_line(&line);
            prop_assert_eq!(entry, Some(NutrientEntry::new(name, f64::from(whole), unit)));
        }

        /// Property: a present section is parsed the same whether or not the others exist
        #[test]
        fn test_missing_sections_do_not_affect_present_ones(
            drop_implications: bool,
            drop_allergens: bool,
        ) {
            let mut text = String::from("Key Nutrients:\n\nIron: 2mg\n\n");
            if !drop_implications {
                text.push_str("Health Implications:\n\n- Good source of iron\n\n");
            }
            if !drop_allergens {
                text.push_str("Allergens:\n\n- Milk\n\n");
            }
            text.push_str("Overall Assessment:\n\nSolid.");

            let result = parse_analysis(&text, Vec::new());
            prop_assert_eq!(result.nutrients, vec![NutrientEntry::new("Iron", 2.0, "mg")]);
            prop_assert_eq!(result.health_implications.is_empty(), drop_implications);
            prop_assert_eq!(result.allergens.is_empty(), drop_allergens);
            prop_assert_eq!(result.overall_assessment, "Solid.");
        }
    }
}
