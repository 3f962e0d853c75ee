use flora_model::{FieldValue, TermLabel, Token, TraitKind, TraitRecord};
use flora_normalization::{number_strings, to_positive_int};

use super::MatchContext;

/// Integer fields of the first range token. Decimal values are not counts.
fn range_fields(ctx: &MatchContext<'_>) -> Option<Vec<(String, FieldValue)>> {
    let token = ctx.tokens().iter().find(|t| t.range_keys().is_some())?;
    let keys = token.range_keys()?;
    let numbers = number_strings(&token.text);
    if numbers.len() != keys.keys().len() {
        return None;
    }
    keys.keys()
        .iter()
        .zip(numbers)
        .map(|(key, number)| Some((key.to_string(), FieldValue::Int(to_positive_int(number)?))))
        .collect()
}

fn find_label<'a>(ctx: &MatchContext<'a>, label: &TermLabel) -> Option<&'a Token> {
    ctx.tokens().iter().find(|t| t.has_label(label))
}

fn build(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let mut record = ctx.record(TraitKind::Count)?;
    for (name, value) in range_fields(ctx)? {
        record.insert(name, value);
    }
    if let Some(per) = find_label(ctx, &TermLabel::PerCount) {
        record.insert("group", ctx.terms.canonical(&per.lower));
    }
    if let Some(suffix) = find_label(ctx, &TermLabel::CountSuffix) {
        record.label = Some(format!("{}_count", ctx.terms.canonical(&suffix.lower)));
    }
    Some(record)
}

/// `10–12`, `3 per flower`
pub fn count(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    build(ctx)
}

/// `5–7-lobed`, `(3–)5+ flowered`
pub fn suffix_count(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let mut record = build(ctx)?;
    if ctx.tokens().iter().any(|t| t.text == "+") {
        record.insert("indefinite", true);
    }
    Some(record)
}

/// `solitary`, `three`, `several` (3 or more)
pub fn count_word(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let token = find_label(ctx, &TermLabel::CountWord)?;
    let value = ctx.terms.count_value(&token.lower)?;
    let mut record = ctx.record(TraitKind::Count)?.with_field("low", value);
    if ctx.terms.is_indefinite(&token.lower) {
        record.insert("indefinite", true);
    }
    Some(record)
}
