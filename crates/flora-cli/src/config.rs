//! Extraction options from a TOML file.
//!
//! ```toml
//! default_part = "plant"
//! trait_filters = ["leaf_*", "*_count"]
//! genus_filters = ["Acer"]
//! highlight_parts = true
//! select_treatment = true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use flora_model::ExtractOptions;
use tracing::debug;

/// Reads options from `path`, or the defaults when there is no file.
pub fn load_options(path: Option<&Path>) -> Result<ExtractOptions> {
    let Some(path) = path else {
        return Ok(ExtractOptions::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let options = parse_options(&text).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), "loaded extraction options");
    Ok(options)
}

pub fn parse_options(text: &str) -> Result<ExtractOptions> {
    Ok(toml::from_str(text)?)
}
