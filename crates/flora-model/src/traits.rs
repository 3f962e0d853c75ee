//! Trait records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Kind of trait a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    Part,
    Subpart,
    Sex,
    Location,
    Size,
    Count,
    Color,
    Shape,
    Descriptor,
}

impl TraitKind {
    pub const ALL: [TraitKind; 9] = [
        TraitKind::Part,
        TraitKind::Subpart,
        TraitKind::Sex,
        TraitKind::Location,
        TraitKind::Size,
        TraitKind::Count,
        TraitKind::Color,
        TraitKind::Shape,
        TraitKind::Descriptor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitKind::Part => "part",
            TraitKind::Subpart => "subpart",
            TraitKind::Sex => "sex",
            TraitKind::Location => "location",
            TraitKind::Size => "size",
            TraitKind::Count => "count",
            TraitKind::Color => "color",
            TraitKind::Shape => "shape",
            TraitKind::Descriptor => "descriptor",
        }
    }

    /// Anchor kinds name themselves; everything else is named after the part
    /// it is linked to.
    pub fn is_anchor(&self) -> bool {
        matches!(self, TraitKind::Part | TraitKind::Subpart | TraitKind::Sex)
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraitKind {
    type Err = ModelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        TraitKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownTraitKind(s.to_string()))
    }
}

/// Measurement axis of a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Width,
    Height,
    Thickness,
    Diameter,
    Dbh,
}

impl Dimension {
    /// Assignment order for groups that do not name their dimension.
    pub const DEFAULT_ORDER: [Dimension; 3] =
        [Dimension::Length, Dimension::Width, Dimension::Thickness];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Width => "width",
            Dimension::Height => "height",
            Dimension::Thickness => "thickness",
            Dimension::Diameter => "diameter",
            Dimension::Dbh => "dbh",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ModelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(Dimension::Length),
            "width" => Ok(Dimension::Width),
            "height" => Ok(Dimension::Height),
            "thickness" => Ok(Dimension::Thickness),
            "diameter" => Ok(Dimension::Diameter),
            "dbh" => Ok(Dimension::Dbh),
            _ => Err(ModelError::UnknownDimension(s.to_string())),
        }
    }
}

/// Value stored in a trait record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(value) => Some(*value),
            FieldValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(value) => write!(f, "{value}"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::List(values) => f.write_str(&values.join(" | ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

/// A structured trait extracted from a span of text.
///
/// `start`/`end` are character offsets into the document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRecord {
    #[serde(rename = "trait")]
    pub kind: TraitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl TraitRecord {
    pub fn new(kind: TraitKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            label: None,
            start,
            end,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The label, falling back to the kind name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.kind.as_str())
    }

    /// Column discriminator: `leaf_size`, `seed_hilum_size`, `leaf_lobe_count`.
    ///
    /// Anchor kinds are named after their label alone.
    pub fn name(&self, default_part: &str) -> String {
        if self.kind.is_anchor() {
            return self.label().to_string();
        }
        let part = self.text("part").unwrap_or(default_part);
        match self.text("subpart") {
            Some(subpart) => format!("{part}_{subpart}_{}", self.label()),
            None => format!("{part}_{}", self.label()),
        }
    }

    /// Checks `0 <= start < end <= text_len`.
    pub fn validate(&self, text_len: usize) -> Result<()> {
        if self.start < self.end && self.end <= text_len {
            Ok(())
        } else {
            Err(ModelError::InvalidSpan {
                start: self.start,
                end: self.end,
                len: text_len,
            })
        }
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}
