//! Locate the heading-delimited sections of an analysis reply
//!
//! Headings are scanned in declaration order, never in the order they occur in
//! the text. Each heading is searched at or after the end of the previously
//! located section, and a section ends where the next declared heading starts.

use tracing::debug;

/// Heading of the nutrient list
pub const KEY_NUTRIENTS: &str = "Key Nutrients:";

/// Heading of the health implication bullets
pub const HEALTH_IMPLICATIONS: &str = "Health Implications:";

/// Heading of the allergen bullets
pub const ALLERGENS: &str = "Allergens:";

/// Heading of the summary paragraph
pub const OVERALL_ASSESSMENT: &str = "Overall Assessment:";

/// The headings the analysis prompt asks for, in order
pub const SECTION_HEADINGS: [&str; 4] = [KEY_NUTRIENTS, HEALTH_IMPLICATIONS, ALLERGENS, OVERALL_ASSESSMENT];

/// Leftover of the "heading, colon, blank line" formatting convention
const HEADING_ARTIFACT: &str = ":\n\n";

/// Raw section contents keyed by heading, in scan order
///
/// Headings that were not found have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    /// Content stored for `heading`
    pub fn get(&self, heading: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(h, _)| h == heading)
            .map(|(_, content)| content.as_str())
    }

    /// Content stored for `heading`, or `""` when the section is missing
    pub fn content_or_empty(&self, heading: &str) -> &str {
        self.get(heading).unwrap_or("")
    }

    /// Whether `heading` was found
    pub fn contains(&self, heading: &str) -> bool {
        self.get(heading).is_some()
    }

    /// Headings that were found, in scan order
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }

    /// Number of sections found
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no section was found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, heading: &str, content: String) {
        self.entries.push((heading.to_string(), content));
    }
}

/// Split `text` into the sections introduced by `headings`
///
/// For each heading, in declaration order:
/// - search starts at the end of the last section found, so a heading that
///   appears before it is treated as missing;
/// - the section ends at the next declared heading found after its content,
///   or at the end of the text;
/// - a missing heading adds no entry and leaves the search position alone.
///
/// Never fails; text without any heading yields an empty map.
///
/// # Examples
///
/// ```
/// use nutriscan_analyzer::sections::{extract_sections, SECTION_HEADINGS};
///
/// let text = "Key Nutrients:\n\nSodium: 200mg\n\nAllergens:\n\n- Soy";
/// let sections = extract_sections(text, &SECTION_HEADINGS);
/// assert_eq!(sections.get("Key Nutrients:"), Some("Sodium: 200mg"));
/// assert_eq!(sections.get("Allergens:"), Some("- Soy"));
/// assert!(!sections.contains("Health Implications:"));
/// ```
pub fn extract_sections(text: &str, headings: &[&str]) -> SectionMap {
    let mut sections = SectionMap::default();
    let mut cursor = 0;

    for (idx, heading) in headings.iter().enumerate() {
        // An empty heading would match at every offset
        if heading.is_empty() {
            continue;
        }

        let later = &headings[idx + 1..];
        let Some(start) = find_heading(text, heading, cursor, later) else {
            debug!("Section heading '{}' not found", heading);
            continue;
        };

        let content_start = start + heading.len();
        let content_end = later
            .iter()
            .enumerate()
            .filter(|(_, next)| !next.is_empty())
            .find_map(|(pos, next)| find_heading(text, next, content_start, &later[pos + 1..]))
            .unwrap_or(text.len());

        sections.insert(heading, clean_content(&text[content_start..content_end]));
        cursor = content_end;
    }

    sections
}

/// Offset of `heading` at or after `from`
///
/// The first occurrence is used, unless it sits inside running text and an
/// occurrence that opens a line comes before any of the `later` headings. That
/// keeps a heading quoted in another section's narrative from ending it early
/// without skipping past the real headings of the reply.
fn find_heading(text: &str, heading: &str, from: usize, later: &[&str]) -> Option<usize> {
    let haystack = text.get(from..)?;
    let mut occurrences = haystack.match_indices(heading).map(|(offset, _)| from + offset);
    let first = occurrences.next()?;
    if opens_line(text, first) {
        return Some(first);
    }

    let limit = later
        .iter()
        .filter(|next| !next.is_empty())
        .filter_map(|next| haystack.find(*next).map(|offset| from + offset))
        .min()
        .unwrap_or(text.len());

    let preferred = occurrences
        .take_while(|&pos| pos < limit)
        .find(|&pos| opens_line(text, pos));
    Some(preferred.unwrap_or(first))
}

/// Only whitespace or markdown heading/emphasis marks precede `pos` on its line
fn opens_line(text: &str, pos: usize) -> bool {
    let line_start = text[..pos].rfind(['\n', '\r']).map_or(0, |i| i + 1);
    text[line_start..pos]
        .chars()
        .all(|c| c.is_whitespace() || c == '#' || c == '*')
}

fn clean_content(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(HEADING_ARTIFACT) {
        Some(rest) => rest.trim().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Key Nutrients:\n\nTotal Fat: 10g\nSodium: 200mg\n\n\
Health Implications:\n\n- High in **sodium**\n\n\
Allergens:\n\n- Peanuts\n- Soy\n\n\
Overall Assessment:\n\nA salty snack best eaten in moderation.";

    #[test]
    fn test_all_sections_found() {
        let sections = extract_sections(WELL_FORMED, &SECTION_HEADINGS);
        assert_eq!(sections.len(), 4);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Total Fat: 10g\nSodium: 200mg"));
        assert_eq!(sections.get(HEALTH_IMPLICATIONS), Some("- High in **sodium**"));
        assert_eq!(sections.get(ALLERGENS), Some("- Peanuts\n- Soy"));
        assert_eq!(
            sections.get(OVERALL_ASSESSMENT),
            Some("A salty snack best eaten in moderation.")
        );
        assert_eq!(sections.headings().collect::<Vec<_>>(), SECTION_HEADINGS.to_vec());
    }

    #[test]
    fn test_preamble_is_ignored() {
        let text = format!("Here is the analysis you asked for.\n\n{}", WELL_FORMED);
        let sections = extract_sections(&text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Total Fat: 10g\nSodium: 200mg"));
    }

    #[test]
    fn test_no_headings() {
        let sections = extract_sections("I could not read this label.", &SECTION_HEADINGS);
        assert!(sections.is_empty());
        assert_eq!(sections.content_or_empty(KEY_NUTRIENTS), "");
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_sections("", &SECTION_HEADINGS).is_empty());
    }

    #[test]
    fn test_missing_last_heading() {
        let text = "Key Nutrients:\n\nSodium: 5mg\n\nHealth Implications:\n\n- Fine\n\nAllergens:\n\n- Milk";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(ALLERGENS), Some("- Milk"));
        assert!(!sections.contains(OVERALL_ASSESSMENT));
    }

    #[test]
    fn test_missing_middle_heading_does_not_swallow_later_sections() {
        let text = "Key Nutrients:\n\nSodium: 5mg\n\nAllergens:\n\n- Milk\n\nOverall Assessment:\n\nOk.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Sodium: 5mg"));
        assert!(!sections.contains(HEALTH_IMPLICATIONS));
        assert_eq!(sections.get(ALLERGENS), Some("- Milk"));
        assert_eq!(sections.get(OVERALL_ASSESSMENT), Some("Ok."));
    }

    #[test]
    fn test_missing_first_heading() {
        let text = "Health Implications:\n\n- Fine\n\nOverall Assessment:\n\nGood.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert!(!sections.contains(KEY_NUTRIENTS));
        assert_eq!(sections.get(HEALTH_IMPLICATIONS), Some("- Fine"));
        assert_eq!(sections.get(OVERALL_ASSESSMENT), Some("Good."));
    }

    #[test]
    fn test_heading_inside_narrative_does_not_truncate() {
        let text = "Key Nutrients:\n\nSodium: 5mg\n\n\
Health Implications:\n\n- Check the Allergens: section before serving to children\n- Low sugar\n\n\
Allergens:\n\n- Wheat\n\n\
Overall Assessment:\n\nFine.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(
            sections.get(HEALTH_IMPLICATIONS),
            Some("- Check the Allergens: section before serving to children\n- Low sugar")
        );
        assert_eq!(sections.get(ALLERGENS), Some("- Wheat"));
    }

    #[test]
    fn test_numbered_headings_with_heading_words_in_narrative() {
        let text = "1. Key Nutrients:\n\nSodium: 5mg\n\n2. Health Implications:\n\n- Salty\n\n\
3. Allergens:\n\n- Soy\n\n4. Overall Assessment:\n\nOk overall.\nHealth Implications: see above.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.len(), 4);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Sodium: 5mg\n\n2."));
        assert_eq!(sections.get(HEALTH_IMPLICATIONS), Some("- Salty\n\n3."));
        assert_eq!(sections.get(ALLERGENS), Some("- Soy\n\n4."));
        assert_eq!(
            sections.get(OVERALL_ASSESSMENT),
            Some("Ok overall.\nHealth Implications: see above.")
        );
    }

    #[test]
    fn test_non_adjacent_heading_in_body_is_not_a_boundary() {
        let text = "Key Nutrients:\n\nSodium: 5mg\nOverall Assessment: is below\n\n\
Health Implications:\n\n- Fine\n\nAllergens:\n\n- None\n\nOverall Assessment:\n\nGood.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(
            sections.get(KEY_NUTRIENTS),
            Some("Sodium: 5mg\nOverall Assessment: is below")
        );
        assert_eq!(sections.get(OVERALL_ASSESSMENT), Some("Good."));
    }

    #[test]
    fn test_earlier_heading_repeated_later_is_not_rematched() {
        let text = "Key Nutrients:\n\nSodium: 5mg\n\nHealth Implications:\n\n- Fine\n\n\
Allergens:\n\n- Soy\n\nOverall Assessment:\n\nSee Key Nutrients: above.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Sodium: 5mg"));
        assert_eq!(sections.get(OVERALL_ASSESSMENT), Some("See Key Nutrients: above."));
    }

    #[test]
    fn test_out_of_order_heading_is_treated_as_missing() {
        // Allergens appears before Key Nutrients, so the scan never reaches it
        let text = "Allergens:\n\n- Soy\n\nKey Nutrients:\n\nSodium: 5mg\n\nOverall Assessment:\n\nOk.";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert!(!sections.contains(ALLERGENS));
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Sodium: 5mg"));
        assert_eq!(sections.get(OVERALL_ASSESSMENT), Some("Ok."));
    }

    #[test]
    fn test_heading_artifact_is_stripped() {
        let text = "Key Nutrients::\n\nSodium: 5mg";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Sodium: 5mg"));
    }

    #[test]
    fn test_bold_headings() {
        let text = "**Key Nutrients:**\n\nSodium: 5mg\n\n**Health Implications:**\n\n- Fine";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("**\n\nSodium: 5mg\n\n**"));
        assert_eq!(sections.get(HEALTH_IMPLICATIONS), Some("**\n\n- Fine"));
    }

    #[test]
    fn test_heading_without_content() {
        let sections = extract_sections("Key Nutrients:", &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some(""));
    }

    #[test]
    fn test_custom_headings_and_empty_heading() {
        let sections = extract_sections("A: one B: two", &["A:", "", "B:"]);
        assert_eq!(sections.get("A:"), Some("one"));
        assert_eq!(sections.get("B:"), Some("two"));
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Key Nutrients:\r\n\r\nSodium: 5mg\r\n\r\nHealth Implications:\r\n\r\n- Fine";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Sodium: 5mg"));
        assert_eq!(sections.get(HEALTH_IMPLICATIONS), Some("- Fine"));
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Key Nutrients:\n\nVitamin B12: 2.4µg\n\nAllergens:\n\n- Crème fraîche";
        let sections = extract_sections(text, &SECTION_HEADINGS);
        assert_eq!(sections.get(KEY_NUTRIENTS), Some("Vitamin B12: 2.4µg"));
        assert_eq!(sections.get(ALLERGENS), Some("- Crème fraîche"));
    }
}
