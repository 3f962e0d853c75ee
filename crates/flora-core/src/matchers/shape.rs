use flora_model::{TermLabel, TraitKind, TraitRecord};

use super::MatchContext;

const MARGIN_CATEGORY: &str = "margin";

/// `broadly ovate-lanceolate`, `coarsely serrate`
///
/// The value joins the canonical shapes with `-`. Margin shapes are relabeled
/// `margin_shape`. The record starts at the first word of the match and ends
/// at its last shape word.
pub fn shape(ctx: &MatchContext<'_>) -> Option<TraitRecord> {
    let tokens = ctx.tokens();
    let first = tokens.iter().find(|t| !t.is_dash())?;
    let last = tokens.iter().rev().find(|t| t.has_label(&TermLabel::Shape))?;

    let mut shapes: Vec<String> = Vec::new();
    let mut margin = false;
    for token in tokens.iter().filter(|t| t.has_label(&TermLabel::Shape)) {
        margin |= ctx.terms.category(&token.lower) == Some(MARGIN_CATEGORY);
        let canonical = ctx.terms.canonical(&token.lower);
        if !shapes.contains(&canonical) {
            shapes.push(canonical);
        }
    }

    let mut record =
        TraitRecord::new(TraitKind::Shape, first.start, last.end).with_field("shape", shapes.join("-"));
    if margin {
        record.label = Some("margin_shape".to_string());
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    #[test]
    fn test_joined_shapes() {
        let fixture = Fixture::new("broadly ovate-elliptical");
        let record = shape(&fixture.all()).expect("shape");
        assert_eq!(record.text("shape"), Some("ovate-elliptic"));
        assert_eq!(record.label(), "shape");
        assert_eq!((record.start, record.end), (0, 24));
    }

    #[test]
    fn test_margin_relabel() {
        let fixture = Fixture::new("coarsely serrate");
        let record = shape(&fixture.all()).expect("shape");
        assert_eq!(record.label(), "margin_shape");
        assert_eq!(record.text("shape"), Some("serrate"));
    }

    #[test]
    fn test_trailing_dash_is_not_in_span() {
        let fixture = Fixture::new("ovate -");
        let record = shape(&fixture.all()).expect("shape");
        assert_eq!(record.end, 5);
    }
}
