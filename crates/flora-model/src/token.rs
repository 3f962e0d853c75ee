//! Annotated tokens.
//!
//! Tokens are produced by an annotator and never mutated afterwards. Every
//! offset is a character offset into the full document text, not a byte offset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One slot of a numeric range notation such as `(12–)23–34(–40)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKey {
    Min,
    Low,
    High,
    Max,
}

impl RangeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKey::Min => "min",
            RangeKey::Low => "low",
            RangeKey::High => "high",
            RangeKey::Max => "max",
        }
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slots a range token fills, in textual order.
///
/// `(12–)23–34` carries `[min, low, high]`; the numbers found in the token
/// text are zipped against these keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeKeys(Vec<RangeKey>);

impl RangeKeys {
    pub fn new(keys: Vec<RangeKey>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[RangeKey] {
        &self.0
    }

    pub fn contains(&self, key: RangeKey) -> bool {
        self.0.contains(&key)
    }

    /// Dotted label form, e.g. `range.min.low.high`.
    pub fn label(&self) -> String {
        let mut label = String::from("range");
        for key in &self.0 {
            label.push('.');
            label.push_str(key.as_str());
        }
        label
    }
}

/// Semantic label attached to a token by term tagging or range grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermLabel {
    Part,
    Subpart,
    Sex,
    Location,
    Color,
    ColorMod,
    Shape,
    ShapeMod,
    Descriptor,
    Units,
    Dimension,
    Cross,
    About,
    Quest,
    CountWord,
    CountSuffix,
    PerCount,
    Missing,
    Range(RangeKeys),
}

impl TermLabel {
    /// Labels that can be loaded from a vocabulary file.
    pub const VOCABULARY: [TermLabel; 18] = [
        TermLabel::Part,
        TermLabel::Subpart,
        TermLabel::Sex,
        TermLabel::Location,
        TermLabel::Color,
        TermLabel::ColorMod,
        TermLabel::Shape,
        TermLabel::ShapeMod,
        TermLabel::Descriptor,
        TermLabel::Units,
        TermLabel::Dimension,
        TermLabel::Cross,
        TermLabel::About,
        TermLabel::Quest,
        TermLabel::CountWord,
        TermLabel::CountSuffix,
        TermLabel::PerCount,
        TermLabel::Missing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermLabel::Part => "part",
            TermLabel::Subpart => "subpart",
            TermLabel::Sex => "sex",
            TermLabel::Location => "location",
            TermLabel::Color => "color",
            TermLabel::ColorMod => "color_mod",
            TermLabel::Shape => "shape",
            TermLabel::ShapeMod => "shape_mod",
            TermLabel::Descriptor => "descriptor",
            TermLabel::Units => "units",
            TermLabel::Dimension => "dim",
            TermLabel::Cross => "cross",
            TermLabel::About => "about",
            TermLabel::Quest => "quest",
            TermLabel::CountWord => "count_word",
            TermLabel::CountSuffix => "count_suffix",
            TermLabel::PerCount => "per_count",
            TermLabel::Missing => "missing",
            TermLabel::Range(_) => "range",
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, TermLabel::Range(_))
    }
}

impl fmt::Display for TermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermLabel::Range(keys) => f.write_str(&keys.label()),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for TermLabel {
    type Err = ModelError;

    /// Parses a vocabulary label. Range labels are only ever assigned by the
    /// tokenizer and cannot be loaded from a file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        TermLabel::VOCABULARY
            .iter()
            .find(|label| label.as_str() == normalized)
            .cloned()
            .ok_or_else(|| ModelError::UnknownLabel(s.to_string()))
    }
}

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adj,
    Adv,
    Aux,
    Adp,
    Cconj,
    Det,
    Num,
    Punct,
    #[default]
    Other,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Other => "X",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An atomic unit of annotated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Lowercased form used for every vocabulary lookup. For merged vocabulary
    /// phrases this is the vocabulary entry itself.
    pub lower: String,
    pub label: Option<TermLabel>,
    pub pos: PartOfSpeech,
    pub start: usize,
    pub end: usize,
    /// Position within the sentence.
    pub index: usize,
}

const DASHES: [char; 5] = ['-', '–', '—', '‐', '‑'];

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        Self {
            text,
            lower,
            label: None,
            pos: PartOfSpeech::Other,
            start,
            end,
            index,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: TermLabel) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = pos;
        self
    }

    pub fn has_label(&self, label: &TermLabel) -> bool {
        self.label.as_ref() == Some(label)
    }

    pub fn range_keys(&self) -> Option<&RangeKeys> {
        match &self.label {
            Some(TermLabel::Range(keys)) => Some(keys),
            _ => None,
        }
    }

    /// True for tokens made only of dash characters.
    pub fn is_dash(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| DASHES.contains(&c))
    }

    pub fn is_punct(&self) -> bool {
        self.pos == PartOfSpeech::Punct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_label_lists_keys_in_order() {
        let keys = RangeKeys::new(vec![RangeKey::Min, RangeKey::Low, RangeKey::High]);
        assert_eq!(keys.label(), "range.min.low.high");
        assert_eq!(TermLabel::Range(keys).to_string(), "range.min.low.high");
    }

    #[test]
    fn test_vocabulary_labels_parse() {
        for label in TermLabel::VOCABULARY {
            let parsed: TermLabel = label.as_str().parse().expect("parse label");
            assert_eq!(parsed, label);
        }
        assert_eq!("  Color_Mod ".parse::<TermLabel>().ok(), Some(TermLabel::ColorMod));
        assert!("range".parse::<TermLabel>().is_err());
    }

    #[test]
    fn test_dash_tokens() {
        assert!(Token::new("–", 0, 1, 0).is_dash());
        assert!(Token::new("--", 0, 2, 0).is_dash());
        assert!(!Token::new("-lobed", 0, 6, 0).is_dash());
    }

    #[test]
    fn test_token_lowercases_text() {
        let token = Token::new("Leaves", 0, 6, 0).with_label(TermLabel::Part);
        assert_eq!(token.lower, "leaves");
        assert!(token.has_label(&TermLabel::Part));
        assert!(token.range_keys().is_none());
    }
}
