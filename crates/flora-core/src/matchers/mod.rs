//! Enrichment of resolved matches into trait records.
//!
//! Each rule carries a [`RuleAction`]. The action maps to a plain function
//! ([`Enricher`]) once, when the rule set is built; `Reject` maps to none and
//! its matches only serve to suppress overlapping ones.

mod color;
mod count;
mod shape;
mod size;
mod term;

use std::fmt;

use flora_model::{AnnotatedSentence, CharOffsets, Token, TraitKind, TraitRecord};
use flora_terms::TermRegistry;

pub use color::{COLOR_CONNECTORS, color};
pub use count::{count, count_word, suffix_count};
pub use shape::shape;
pub use size::{size, size_double_dim, size_high_only};
pub use term::{descriptor, term};

/// Everything an enricher may look at for one resolved match.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub text: &'a str,
    pub offsets: &'a CharOffsets,
    pub sentence: &'a AnnotatedSentence,
    pub terms: &'a TermRegistry,
    /// First token of the match.
    pub start: usize,
    /// One past the last token of the match.
    pub end: usize,
}

impl<'a> MatchContext<'a> {
    pub fn tokens(&self) -> &'a [Token] {
        let end = self.end.min(self.sentence.tokens.len());
        self.sentence.tokens.get(self.start..end).unwrap_or(&[])
    }

    /// Character span of the whole match.
    pub fn char_span(&self) -> Option<(usize, usize)> {
        self.sentence.char_span(self.start, self.end)
    }

    /// Source text of the whole match.
    pub fn raw(&self) -> &'a str {
        match self.char_span() {
            Some((start, end)) => self.offsets.slice(self.text, start, end),
            None => "",
        }
    }

    /// A record of `kind` spanning the whole match.
    pub fn record(&self, kind: TraitKind) -> Option<TraitRecord> {
        let (start, end) = self.char_span()?;
        Some(TraitRecord::new(kind, start, end))
    }
}

/// Builds a record from a match, or rejects it with `None`.
pub type Enricher = fn(&MatchContext<'_>) -> Option<TraitRecord>;

/// What a rule does with the spans it wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleAction {
    Size,
    SizeHighOnly,
    SizeDoubleDim,
    Count,
    SuffixCount,
    CountWord,
    Color,
    Shape,
    Descriptor,
    Term,
    Reject,
}

impl RuleAction {
    pub fn enricher(self) -> Option<Enricher> {
        let enricher: Enricher = match self {
            Self::Size => size,
            Self::SizeHighOnly => size_high_only,
            Self::SizeDoubleDim => size_double_dim,
            Self::Count => count,
            Self::SuffixCount => suffix_count,
            Self::CountWord => count_word,
            Self::Color => color,
            Self::Shape => shape,
            Self::Descriptor => descriptor,
            Self::Term => term,
            Self::Reject => return None,
        };
        Some(enricher)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::SizeHighOnly => "size_high_only",
            Self::SizeDoubleDim => "size_double_dim",
            Self::Count => "count",
            Self::SuffixCount => "suffix_count",
            Self::CountWord => "count_word",
            Self::Color => "color",
            Self::Shape => "shape",
            Self::Descriptor => "descriptor",
            Self::Term => "term",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use flora_model::{AnnotatedSentence, CharOffsets};
    use flora_terms::TermRegistry;

    use crate::annotate::{Annotator, RuleAnnotator};

    /// Owns everything a [`super::MatchContext`] borrows.
    pub struct Fixture {
        pub text: String,
        pub offsets: CharOffsets,
        pub sentence: AnnotatedSentence,
        pub terms: Arc<TermRegistry>,
    }

    impl Fixture {
        pub fn new(text: &str) -> Self {
            let terms = TermRegistry::builtin().expect("builtin terms");
            let mut sentences = RuleAnnotator::new(Arc::clone(&terms))
                .annotate(text)
                .expect("annotate");
            assert_eq!(sentences.len(), 1, "fixture must be one sentence");
            Self {
                text: text.to_string(),
                offsets: CharOffsets::new(text),
                sentence: sentences.remove(0),
                terms,
            }
        }

        /// Context over tokens `[start, end)`.
        pub fn context(&self, start: usize, end: usize) -> super::MatchContext<'_> {
            super::MatchContext {
                text: &self.text,
                offsets: &self.offsets,
                sentence: &self.sentence,
                terms: &self.terms,
                start,
                end,
            }
        }

        /// Context over the whole sentence.
        pub fn all(&self) -> super::MatchContext<'_> {
            self.context(0, self.sentence.tokens.len())
        }
    }
}
