//! Output filters: trait names and taxon names.

use regex::{Regex, RegexBuilder};

use crate::error::{CoreError, Result};

/// Keeps traits whose name matches one of a set of wildcard patterns
/// (`leaf_*`, `*_size`, `seed_?_count`). No patterns keeps everything.
#[derive(Debug, Clone, Default)]
pub struct TraitFilter {
    patterns: Vec<Regex>,
}

fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::from("^");
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    pattern
}

impl TraitFilter {
    pub fn new(globs: &[String]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|glob| {
                Regex::new(&glob_to_regex(glob)).map_err(|source| CoreError::Filter {
                    filter: glob.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(name))
    }
}

/// Case-insensitive taxon filter; spaces in a genus match any whitespace.
#[derive(Debug, Clone, Default)]
pub struct GenusFilter {
    pattern: Option<Regex>,
}

impl GenusFilter {
    pub fn new(genera: &[String]) -> Result<Self> {
        if genera.is_empty() {
            return Ok(Self::default());
        }
        let joined = genera
            .iter()
            .map(|genus| genus.split_whitespace().collect::<Vec<_>>().join(r"\s"))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&joined)
            .case_insensitive(true)
            .build()
            .map_err(|source| CoreError::Filter {
                filter: joined.clone(),
                source,
            })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn matches(&self, taxon: &str) -> bool {
        self.pattern.as_ref().is_none_or(|re| re.is_match(taxon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_wildcards() {
        let filter = TraitFilter::new(&globs(&["leaf_*", "*_size"])).expect("filter");
        assert!(filter.matches("leaf_lobe_count"));
        assert!(filter.matches("seed_hilum_size"));
        assert!(!filter.matches("petal_color"));
        assert!(!filter.matches("leaf"));
    }

    #[test]
    fn test_question_mark_and_literal_dots() {
        let filter = TraitFilter::new(&globs(&["leaf_?ize", "a.b"])).expect("filter");
        assert!(filter.matches("leaf_size"));
        assert!(!filter.matches("axb"));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert!(TraitFilter::default().matches("anything"));
        assert!(GenusFilter::new(&[]).expect("filter").matches("Acer"));
    }

    #[test]
    fn test_genus_filter() {
        let filter = GenusFilter::new(&globs(&["acer", "Quercus  alba"])).expect("filter");
        assert!(filter.matches("Acer saccharum"));
        assert!(filter.matches("Quercus alba"));
        assert!(!filter.matches("Betula nigra"));
    }

    #[test]
    fn test_invalid_genus_regex() {
        assert!(GenusFilter::new(&globs(&["("])).is_err());
    }
}
