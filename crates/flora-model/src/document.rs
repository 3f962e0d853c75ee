use serde::{Deserialize, Serialize};

use crate::offset::{CharOffsets, TextSpan};
use crate::traits::TraitRecord;

/// Extraction result for one treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub sentences: Vec<TextSpan>,
    pub traits: Vec<TraitRecord>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sentences: Vec::new(),
            traits: Vec::new(),
        }
    }

    /// Source text covered by a record.
    pub fn raw(&self, record: &TraitRecord) -> &str {
        CharOffsets::new(&self.text).slice(&self.text, record.start, record.end)
    }
}
