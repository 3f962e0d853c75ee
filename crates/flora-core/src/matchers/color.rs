use flora_model::{FieldValue, TermLabel, Token, TraitKind, TraitRecord};
use flora_normalization::normalize_color_group;

use super::MatchContext;

/// Words that may sit between colors in one color phrase. They separate
/// color groups: `green or greenish yellow` holds two.
pub const COLOR_CONNECTORS: &[&str] = &[
    "or",
    "to",
    "and",
    ",",
    ";",
    "usually",
    "rarely",
    "often",
    "sometimes",
    "commonly",
    "occasionally",
    "not",
    "with",
    "becoming",
    "(",
    ")",
    "[",
    "]",
];

pub(crate) fn is_connector(token: &Token) -> bool {
    token.label.is_none() && COLOR_CONNECTORS.contains(&token.lower.as_str())
}

/// `green or greenish yellow, usually not purple-spotted`
pub fn color(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let tokens = ctx.tokens();
    let mut colors: Vec<String> = Vec::new();
    for group in tokens.split(is_connector) {
        if !group.iter().any(|t| t.has_label(&TermLabel::Color)) {
            continue;
        }
        let members: Vec<&Token> = group.iter().collect();
        if let Some(value) = normalize_color_group(&members, ctx.terms) {
            colors.push(value);
        }
    }
    if colors.is_empty() {
        return None;
    }
    colors.sort();
    colors.dedup();

    let mut record = ctx
        .record(TraitKind::Color)?
        .with_field("color", FieldValue::List(colors))
        .with_field("raw_value", ctx.raw());
    if tokens.iter().any(|t| t.has_label(&TermLabel::Missing)) {
        record.insert("missing", true);
    }
    Some(record)
}
