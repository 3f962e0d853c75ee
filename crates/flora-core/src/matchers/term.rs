use flora_model::{TermLabel, TraitKind, TraitRecord};
use flora_normalization::clean_sex;

use super::MatchContext;

/// Single vocabulary words: parts, subparts, sexes and locations.
pub fn term(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let token = ctx.tokens().first()?;
    let kind = match token.label.as_ref()? {
        TermLabel::Part => TraitKind::Part,
        TermLabel::Subpart => TraitKind::Subpart,
        TermLabel::Sex => TraitKind::Sex,
        TermLabel::Location => TraitKind::Location,
        _ => return None,
    };
    let canonical = ctx.terms.canonical(&token.lower);
    let value = if kind == TraitKind::Sex {
        clean_sex(&canonical)
    } else {
        canonical
    };
    Some(ctx.record(kind)?.with_field(kind.as_str(), value))
}

/// `deciduous`, `monoecious`: relabeled with the vocabulary category.
pub fn descriptor(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let token = ctx
        .tokens()
        .iter()
        .find(|t| t.has_label(&TermLabel::Descriptor))?;
    let category = ctx.terms.category(&token.lower).unwrap_or("descriptor").to_string();
    let value = ctx.terms.canonical(&token.lower);
    Some(
        ctx.record(TraitKind::Descriptor)?
            .with_field(category.clone(), value)
            .with_label(category),
    )
}
