//! Picks the descriptive paragraph out of a treatment page.
//!
//! A treatment holds a nomenclature paragraph, the morphological description
//! and distribution notes. The description is the paragraph naming the most
//! distinct plant parts.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use flora_model::TermLabel;
use flora_terms::TermRegistry;
use regex::Regex;
use tracing::debug;

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("PARAGRAPH_BREAK_RE regex is invalid"));
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\W\d_]+").expect("WORD_RE regex is invalid"));

/// Stop scanning once a paragraph names more parts than this.
const ENOUGH_PARTS: usize = 3;

/// Distinct canonical part names mentioned in `text`.
pub fn distinct_parts(text: &str, terms: &TermRegistry) -> BTreeSet<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| terms.label(word) == Some(&TermLabel::Part))
        .map(|word| terms.canonical(&word))
        .collect()
}

/// Returns the paragraph with the most distinct part mentions, whitespace
/// collapsed. Text without any part mention is returned unchanged.
pub fn select_treatment(text: &str, terms: &TermRegistry) -> String {
    let mut best: Option<String> = None;
    let mut high = 0;
    for paragraph in PARAGRAPH_BREAK_RE.split(text) {
        let unique = distinct_parts(paragraph, terms).len();
        if unique > high {
            best = Some(paragraph.split_whitespace().collect::<Vec<_>>().join(" "));
            high = unique;
        }
        if high > ENOUGH_PARTS {
            break;
        }
    }
    match best {
        Some(paragraph) => {
            debug!(parts = high, "selected treatment paragraph");
            paragraph
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_paragraph_wins() {
        let terms = TermRegistry::builtin().expect("builtin terms");
        let text = "Acer saccharum Marshall, Hist. Amer. 4. 1785.\n\n\
                    Trees to 40 m. Leaves 3–5-lobed;\n  petioles 3–8 cm. Flowers yellow.\n\n\
                    Flowering spring. Woods; 0–1600 m.";
        assert_eq!(
            select_treatment(text, &terms),
            "Trees to 40 m. Leaves 3–5-lobed; petioles 3–8 cm. Flowers yellow."
        );
    }

    #[test]
    fn test_text_without_parts_is_kept() {
        let terms = TermRegistry::builtin().expect("builtin terms");
        let text = "green or\nyellow";
        assert_eq!(select_treatment(text, &terms), text);
    }

    #[test]
    fn test_distinct_parts_are_canonical() {
        let terms = TermRegistry::builtin().expect("builtin terms");
        let parts = distinct_parts("Leaves and leaf blades; petals", &terms);
        assert!(parts.contains("leaf"));
        assert!(parts.contains("petal"));
    }
}
