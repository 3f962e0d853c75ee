//! Data model for botanical trait extraction: annotated tokens, sentences
//! with dependency graphs, trait records and extraction options.

pub mod document;
pub mod error;
pub mod offset;
pub mod options;
pub mod sentence;
pub mod token;
pub mod traits;

pub use document::Document;
pub use error::{ModelError, Result};
pub use offset::{CharOffsets, TextSpan};
pub use options::{DEFAULT_PART, ExtractOptions};
pub use sentence::{AnnotatedSentence, DependencyGraph};
pub use token::{PartOfSpeech, RangeKey, RangeKeys, TermLabel, Token};
pub use traits::{Dimension, FieldValue, TraitKind, TraitRecord};
