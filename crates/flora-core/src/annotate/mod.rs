//! Text annotation: sentences, tokens, vocabulary labels and dependency heads.
//!
//! The extraction pipeline only depends on the [`Annotator`] trait. The
//! bundled [`RuleAnnotator`] needs no model files; it segments with
//! punctuation rules, tags with the shared vocabulary and derives heads from
//! part and subpart positions.

mod parser;
mod sentences;
mod tagger;
mod tokenizer;

use std::sync::Arc;

use flora_model::{AnnotatedSentence, CharOffsets};
use flora_terms::TermRegistry;
use tracing::trace;

use crate::error::Result;

pub use parser::{heads, parse};
pub use sentences::split_sentences;
pub use tagger::{PhraseIndex, part_of_speech};
pub use tokenizer::tokenize;

/// Turns raw text into annotated sentences.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedSentence>>;
}

/// Vocabulary-driven annotator.
#[derive(Debug, Clone)]
pub struct RuleAnnotator {
    phrases: PhraseIndex,
}

impl RuleAnnotator {
    pub fn new(terms: Arc<TermRegistry>) -> Self {
        Self {
            phrases: PhraseIndex::new(&terms),
        }
    }
}

impl Annotator for RuleAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedSentence>> {
        let offsets = CharOffsets::new(text);
        let mut annotated = Vec::new();
        for span in split_sentences(text) {
            let tokens = tokenize(text, &offsets, span);
            let tokens = tagger::tag_terms(tokens, &self.phrases, text, &offsets);
            let mut tokens = tagger::merge_bracketed(tokens, text, &offsets);
            tagger::assign_pos(&mut tokens);
            let graph = parse(&tokens)?;
            trace!(start = span.start, end = span.end, tokens = tokens.len(), "annotated sentence");
            annotated.push(AnnotatedSentence::new(span.start, span.end, tokens, graph));
        }
        Ok(annotated)
    }
}

#[cfg(test)]
mod tests {
    use flora_model::TermLabel;

    use super::*;

    #[test]
    fn test_annotates_each_sentence() {
        let annotator = RuleAnnotator::new(TermRegistry::builtin().expect("builtin terms"));
        let sentences = annotator
            .annotate("Leaves ovate, 3–5 cm. Petals white.")
            .expect("annotate");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].start, 22);
        let first = &sentences[0];
        assert_eq!(first.tokens[0].label, Some(TermLabel::Part));
        assert_eq!(first.graph.len(), first.tokens.len());
        assert_eq!(first.graph.head(1), Some(0));
    }
}
