//! Extraction options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Part name used for traits that are never linked to a part.
pub const DEFAULT_PART: &str = "plant";

/// Options controlling extraction and output.
///
/// Loaded from a TOML file by the CLI; every field has a default so an empty
/// file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Part name for traits without a linked part.
    pub default_part: String,
    /// Wildcard patterns over trait names (`leaf_*`, `*_size`). Empty keeps everything.
    pub trait_filters: Vec<String>,
    /// Case-insensitive patterns matched against document identifiers.
    pub genus_filters: Vec<String>,
    /// Directory holding `terms.csv` and `units.csv`, replacing the built-in tables.
    pub terms_dir: Option<PathBuf>,
    /// Render part mentions in bold in HTML output.
    pub highlight_parts: bool,
    /// Only extract from the paragraph most likely to be the description.
    pub select_treatment: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_part: DEFAULT_PART.to_string(),
            trait_filters: Vec::new(),
            genus_filters: Vec::new(),
            terms_dir: None,
            highlight_parts: true,
            select_treatment: true,
        }
    }
}
