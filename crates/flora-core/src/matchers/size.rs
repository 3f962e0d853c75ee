use std::str::FromStr;

use flora_model::{Dimension, TermLabel, TraitKind, TraitRecord};
use flora_normalization::{
    DimensionGroup, assign_dimensions, clean_sex, number_strings, propagate_units, size_fields,
    to_positive_float,
};

use super::MatchContext;

/// Dimension groups of a size match plus any dimension words that were not
/// attached to a group.
struct Scan {
    groups: Vec<DimensionGroup>,
    dims: Vec<Dimension>,
}

/// Walks the match left to right. A cross or a second range opens a new group;
/// units, dimension, sex and uncertainty words apply to the current group.
/// With `collect_dims` dimension words are gathered separately instead.
fn scan(ctx: &MatchContext<'_>, collect_dims: bool) -> Option<Scan> {
    let mut groups = vec![DimensionGroup::default()];
    let mut dims = Vec::new();
    for token in ctx.tokens() {
        let Some(label) = &token.label else {
            continue;
        };
        match label {
            TermLabel::Cross => groups.push(DimensionGroup::default()),
            TermLabel::Range(keys) => {
                if groups.last().is_some_and(DimensionGroup::has_values) {
                    groups.push(DimensionGroup::default());
                }
                let numbers = number_strings(&token.text);
                if numbers.len() != keys.keys().len() {
                    return None;
                }
                let group = groups.last_mut()?;
                for (key, number) in keys.keys().iter().zip(numbers) {
                    group.set(*key, to_positive_float(number)?);
                }
            }
            TermLabel::Units => {
                groups.last_mut()?.units = Some(ctx.terms.canonical(&token.lower));
            }
            TermLabel::Dimension => {
                let dimension = Dimension::from_str(&ctx.terms.canonical(&token.lower)).ok()?;
                if collect_dims {
                    dims.push(dimension);
                } else {
                    groups.last_mut()?.name_dimension(dimension);
                }
            }
            TermLabel::Sex => {
                groups.last_mut()?.sex = Some(clean_sex(&ctx.terms.canonical(&token.lower)));
            }
            TermLabel::Quest => groups.last_mut()?.uncertain = true,
            _ => {}
        }
    }
    groups.retain(DimensionGroup::has_values);
    if groups.is_empty() {
        return None;
    }
    Some(Scan { groups, dims })
}

fn finish(ctx: &MatchContext<'_>, groups: &[DimensionGroup]) -> Option<TraitRecord> {
    let fields = size_fields(groups);
    if fields.is_empty() {
        return None;
    }
    let mut record = ctx.record(TraitKind::Size)?;
    record.fields = fields;
    Some(record)
}

/// `(12-)23-34 × 45-56 cm`
pub fn size(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let Scan { mut groups, .. } = scan(ctx, false)?;
    propagate_units(&mut groups);
    assign_dimensions(&mut groups);
    finish(ctx, &groups)
}

/// `to 5 mm`: the only number is an upper bound.
pub fn size_high_only(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let Scan { mut groups, .. } = scan(ctx, false)?;
    for group in &mut groups {
        group.low_to_high();
    }
    propagate_units(&mut groups);
    assign_dimensions(&mut groups);
    finish(ctx, &groups)
}

/// `3–5 mm long and wide`: one measurement shared by two named dimensions, or
/// two measurements named in order.
pub fn size_double_dim(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let Scan { groups, dims } = scan(ctx, true)?;
    let mut named: Vec<DimensionGroup> = if groups.len() == 1 {
        dims.iter()
            .map(|dim| {
                let mut group = groups[0].clone();
                group.name_dimension(*dim);
                group
            })
            .collect()
    } else {
        groups
            .into_iter()
            .zip(dims.iter())
            .map(|(mut group, dim)| {
                group.name_dimension(*dim);
                group
            })
            .collect()
    };
    propagate_units(&mut named);
    finish(ctx, &named)
}
