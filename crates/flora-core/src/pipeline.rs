//! Trait extraction pipeline.
//!
//! # Per-sentence stages
//!
//! 1. **Match** - every enabled rule pattern yields candidate spans
//! 2. **Resolve** - overlapping candidates are reduced by tier and length
//! 3. **Enrich** - each winner's enricher builds a record or rejects it
//! 4. **Link** - sex, part and subpart linkers fill link fields
//! 5. **Validate** - records with impossible spans are dropped with a warning
//!
//! # Example
//!
//! ```ignore
//! use flora_core::TraitPipeline;
//! use flora_model::ExtractOptions;
//! use flora_terms::TermRegistry;
//!
//! let pipeline = TraitPipeline::new(TermRegistry::builtin()?, ExtractOptions::default())?;
//! let document = pipeline.parse("acer-rubrum", "Leaves 3–5-lobed.")?;
//! ```

use std::sync::Arc;

use flora_model::{AnnotatedSentence, CharOffsets, Document, ExtractOptions, TextSpan, TraitRecord};
use flora_terms::TermRegistry;
use tracing::{debug, info_span, trace, warn};

use crate::annotate::{Annotator, RuleAnnotator};
use crate::error::Result;
use crate::filter::TraitFilter;
use crate::linker::{Linker, default_linkers};
use crate::matchers::MatchContext;
use crate::resolver::resolve;
use crate::rules::RuleSet;
use crate::table::AnnotationTable;
use crate::treatment::select_treatment;

/// Turns treatment text into ordered trait records.
///
/// Rules, linkers and lookup tables are immutable once built, so a pipeline
/// can be shared between threads.
pub struct TraitPipeline {
    terms: Arc<TermRegistry>,
    options: ExtractOptions,
    annotator: Box<dyn Annotator>,
    rules: RuleSet,
    linkers: Vec<Linker>,
    trait_filter: TraitFilter,
}

impl TraitPipeline {
    /// Builds a pipeline with the bundled rule-based annotator.
    pub fn new(terms: Arc<TermRegistry>, options: ExtractOptions) -> Result<Self> {
        let annotator = Box::new(RuleAnnotator::new(Arc::clone(&terms)));
        Self::with_annotator(terms, options, annotator)
    }

    /// Builds a pipeline around another annotator.
    pub fn with_annotator(
        terms: Arc<TermRegistry>,
        options: ExtractOptions,
        annotator: Box<dyn Annotator>,
    ) -> Result<Self> {
        let trait_filter = TraitFilter::new(&options.trait_filters)?;
        Ok(Self {
            terms,
            options,
            annotator,
            rules: RuleSet::builtin()?,
            linkers: default_linkers()?,
            trait_filter,
        })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn terms(&self) -> &Arc<TermRegistry> {
        &self.terms
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Rule switches, e.g. to disable `descriptor` matching.
    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Extracts the traits of one document.
    pub fn parse(&self, id: &str, text: &str) -> Result<Document> {
        let span = info_span!("parse", document = %id);
        let _guard = span.enter();

        let text = if self.options.select_treatment {
            select_treatment(text, &self.terms)
        } else {
            text.to_string()
        };
        let offsets = CharOffsets::new(&text);
        let sentences = self.annotator.annotate(&text)?;

        let mut traits = Vec::new();
        for sentence in &sentences {
            traits.extend(self.parse_sentence(&text, &offsets, sentence));
        }
        traits.retain(|record| {
            self.trait_filter
                .matches(&record.name(&self.options.default_part))
        });
        traits.sort_by_key(|record| (record.start, record.end));
        debug!(
            sentences = sentences.len(),
            traits = traits.len(),
            "parsed document"
        );

        let mut document = Document::new(id, text);
        document.sentences = sentences
            .iter()
            .map(|s| TextSpan::new(s.start, s.end))
            .collect();
        document.traits = traits;
        Ok(document)
    }

    fn parse_sentence(
        &self,
        text: &str,
        offsets: &CharOffsets,
        sentence: &AnnotatedSentence,
    ) -> Vec<TraitRecord> {
        let candidates = self.rules.candidates(&sentence.tokens);
        let candidate_count = candidates.len();
        let winners = resolve(candidates);
        debug!(
            start = sentence.start,
            candidates = candidate_count,
            winners = winners.len(),
            "resolved sentence"
        );

        let mut table = AnnotationTable::new(sentence.tokens.len());
        for winner in winners {
            let Some(rule) = self.rules.get(winner.rule) else {
                continue;
            };
            let Some(enrich) = rule.enricher() else {
                trace!(rule = rule.id(), start = winner.start, "suppressed by reject rule");
                continue;
            };
            let context = MatchContext {
                text,
                offsets,
                sentence,
                terms: &self.terms,
                start: winner.start,
                end: winner.end,
            };
            match enrich(&context) {
                Some(record) => {
                    trace!(rule = rule.id(), raw = context.raw(), "matched");
                    table.push(record, winner.start, winner.end);
                }
                None => trace!(rule = rule.id(), raw = context.raw(), "enrichment rejected"),
            }
        }

        for linker in &self.linkers {
            linker.link(&sentence.tokens, &sentence.graph, &mut table);
        }

        let text_len = offsets.char_len();
        table
            .into_records()
            .into_iter()
            .filter(|record| match record.validate(text_len) {
                Ok(()) => true,
                Err(error) => {
                    warn!(%error, kind = %record.kind, "dropping invalid trait record");
                    false
                }
            })
            .collect()
    }
}
