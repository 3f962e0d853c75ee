//! Rule engine that turns botanical treatment text into trait records.
//!
//! Text is annotated sentence by sentence, token patterns propose candidate
//! spans, the resolver keeps a non-overlapping subset, enrichers build the
//! records and dependency linkers attach the part, subpart and sex each trait
//! belongs to.

pub mod annotate;
pub mod error;
pub mod filter;
pub mod linker;
pub mod matchers;
pub mod pattern;
pub mod pipeline;
pub mod resolver;
pub mod rules;
pub mod table;
pub mod treatment;

pub use annotate::{Annotator, RuleAnnotator};
pub use error::{CoreError, Result};
pub use filter::{GenusFilter, TraitFilter};
pub use linker::{LinkPattern, Linker, default_linkers};
pub use matchers::{Enricher, MatchContext, RuleAction};
pub use pattern::{Decoder, TokenPattern};
pub use pipeline::TraitPipeline;
pub use resolver::{Candidate, DEFAULT_PRIORITY, resolve};
pub use rules::{Rule, RuleSet, TERM_PRIORITY};
pub use table::AnnotationTable;
pub use treatment::select_treatment;
