//! Color value normalization.

use flora_model::{TermLabel, Token};
use flora_terms::TermRegistry;

/// Normalizes one color group, e.g. `greenish yellow` -> `green-yellow`.
///
/// Dash and missing-color tokens are skipped, removable modifiers ("pale",
/// "dark") are dropped, the rest are canonicalized, de-duplicated and joined
/// with `-`. The joined value goes through one more whole-string lookup.
pub fn normalize_color_group(tokens: &[&Token], terms: &TermRegistry) -> Option<String> {
    let parts = tokens
        .iter()
        .filter(|token| !token.is_dash() && !token.has_label(&TermLabel::Missing))
        .map(|token| token.lower.as_str());
    join_color_parts(parts, terms)
}

/// Normalizes an already joined color value. Canonical values map to themselves.
pub fn normalize_color_value(value: &str, terms: &TermRegistry) -> Option<String> {
    join_color_parts(value.split('-'), terms)
}

fn join_color_parts<'a>(
    parts: impl Iterator<Item = &'a str>,
    terms: &TermRegistry,
) -> Option<String> {
    let mut kept: Vec<String> = Vec::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() || terms.is_removed(part) {
            continue;
        }
        let canonical = terms.canonical(part);
        if !kept.contains(&canonical) {
            kept.push(canonical);
        }
    }
    if kept.is_empty() {
        return None;
    }
    let joined = collapse_dashes(&kept.join("-"));
    if joined.is_empty() {
        return None;
    }
    Some(terms.canonical(&joined))
}

/// Collapses runs of dashes and trims them from both ends.
pub fn collapse_dashes(value: &str) -> String {
    value
        .split('-')
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
