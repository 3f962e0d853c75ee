//! Process-wide vocabulary registry.
//!
//! A [`TermRegistry`] is built once and shared immutably (`Arc`) with the
//! annotator, matchers and normalizer.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use flora_model::TermLabel;
use tracing::debug;

use crate::error::{Result, TermsError};
use crate::loaders::{TermRow, load_term_rows, load_unit_factors};
use crate::paths::{TERMS_FILE, UNITS_FILE, terms_dir_override};

const BUILTIN_TERMS: &str = include_str!("../../../terms/terms.csv");
const BUILTIN_UNITS: &str = include_str!("../../../terms/units.csv");

/// Category marking modifiers that are dropped from normalized values.
pub const REMOVE_CATEGORY: &str = "remove";
/// Category of count words that give a lower bound only ("several").
pub const INDEFINITE_CATEGORY: &str = "indefinite";

static BUILTIN: OnceLock<Arc<TermRegistry>> = OnceLock::new();

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub label: TermLabel,
    pub pattern: String,
    pub replace: Option<String>,
    pub category: Option<String>,
}

impl From<TermRow> for Term {
    fn from(row: TermRow) -> Self {
        Self {
            label: row.label,
            pattern: row.pattern,
            replace: row.replace,
            category: row.category,
        }
    }
}

/// Vocabulary, synonym and unit tables.
#[derive(Debug, Clone)]
pub struct TermRegistry {
    terms: Vec<Term>,
    /// Lowercase pattern -> index into `terms`. Later rows win.
    by_pattern: HashMap<String, usize>,
    /// Lowercase pattern -> canonical value, closed over replace chains.
    canonical: HashMap<String, String>,
    unit_factors: BTreeMap<String, f64>,
}

impl TermRegistry {
    /// Builds a registry from already-parsed tables.
    pub fn new(terms: Vec<Term>, unit_factors: BTreeMap<String, f64>) -> Self {
        let mut by_pattern = HashMap::with_capacity(terms.len());
        for (idx, term) in terms.iter().enumerate() {
            by_pattern.insert(term.pattern.clone(), idx);
        }
        let replace: HashMap<&str, &str> = terms
            .iter()
            .filter_map(|term| Some((term.pattern.as_str(), term.replace.as_deref()?)))
            .collect();
        let mut canonical = HashMap::with_capacity(replace.len());
        for &start in replace.keys() {
            canonical.insert(start.to_string(), resolve_chain(&replace, start));
        }
        Self {
            terms,
            by_pattern,
            canonical,
            unit_factors,
        }
    }

    /// The compiled-in tables, parsed once per process.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded CSV files are malformed.
    pub fn builtin() -> Result<Arc<TermRegistry>> {
        if let Some(registry) = BUILTIN.get() {
            return Ok(Arc::clone(registry));
        }
        let terms = load_term_rows(BUILTIN_TERMS.as_bytes(), Path::new(TERMS_FILE))?;
        let units = load_unit_factors(BUILTIN_UNITS.as_bytes(), Path::new(UNITS_FILE))?;
        let registry = Arc::new(Self::new(
            terms.into_iter().map(Term::from).collect(),
            units,
        ));
        Ok(Arc::clone(BUILTIN.get_or_init(|| registry)))
    }

    /// Loads `terms.csv` and `units.csv` from a directory.
    pub fn from_dir(dir: &Path) -> Result<TermRegistry> {
        let terms_path = dir.join(TERMS_FILE);
        let units_path = dir.join(UNITS_FILE);
        let terms_file = File::open(&terms_path).map_err(|e| TermsError::io(&terms_path, e))?;
        let units_file = File::open(&units_path).map_err(|e| TermsError::io(&units_path, e))?;
        let terms = load_term_rows(terms_file, &terms_path)?;
        let units = load_unit_factors(units_file, &units_path)?;
        debug!(
            dir = %dir.display(),
            terms = terms.len(),
            units = units.len(),
            "loaded vocabulary"
        );
        Ok(Self::new(terms.into_iter().map(Term::from).collect(), units))
    }

    /// Resolution order: explicit directory, `FLORA_TERMS_DIR`, built-in tables.
    pub fn load(dir: Option<&Path>) -> Result<Arc<TermRegistry>> {
        let dir: Option<PathBuf> = dir.map(Path::to_path_buf).or_else(terms_dir_override);
        match dir {
            Some(dir) => Ok(Arc::new(Self::from_dir(&dir)?)),
            None => Self::builtin(),
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn get(&self, lower: &str) -> Option<&Term> {
        self.by_pattern.get(lower).map(|&idx| &self.terms[idx])
    }

    pub fn label(&self, lower: &str) -> Option<&TermLabel> {
        self.get(lower).map(|term| &term.label)
    }

    pub fn category(&self, lower: &str) -> Option<&str> {
        self.get(lower).and_then(|term| term.category.as_deref())
    }

    /// Canonical form of a lowercased term; unmapped values pass through.
    pub fn canonical(&self, lower: &str) -> String {
        self.canonical
            .get(lower)
            .cloned()
            .unwrap_or_else(|| lower.to_string())
    }

    /// Modifiers dropped from normalized values ("pale", "dark", ...).
    pub fn is_removed(&self, lower: &str) -> bool {
        self.category(lower) == Some(REMOVE_CATEGORY)
    }

    pub fn is_indefinite(&self, lower: &str) -> bool {
        self.category(lower) == Some(INDEFINITE_CATEGORY)
    }

    /// Integer value of a count word ("three" -> 3).
    pub fn count_value(&self, lower: &str) -> Option<i64> {
        let term = self.get(lower)?;
        if term.label != TermLabel::CountWord {
            return None;
        }
        term.replace.as_deref()?.parse().ok()
    }

    /// Millimeters per unit for a canonical or synonym unit.
    pub fn mm_factor(&self, units: &str) -> Option<f64> {
        let lower = units.to_lowercase();
        self.unit_factors
            .get(&lower)
            .or_else(|| self.unit_factors.get(&self.canonical(&lower)))
            .copied()
    }

    pub fn unit_factors(&self) -> &BTreeMap<String, f64> {
        &self.unit_factors
    }

    /// Number of vocabulary entries per label.
    pub fn label_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for term in &self.terms {
            *counts.entry(term.label.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

fn resolve_chain(replace: &HashMap<&str, &str>, start: &str) -> String {
    let mut seen = HashSet::new();
    let mut current = start;
    while let Some(&next) = replace.get(current) {
        if next == current || !seen.insert(current) {
            break;
        }
        current = next;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(label: TermLabel, pattern: &str, replace: Option<&str>) -> Term {
        Term {
            label,
            pattern: pattern.to_string(),
            replace: replace.map(str::to_string),
            category: None,
        }
    }

    #[test]
    fn test_canonical_falls_back_to_input() {
        let registry = TermRegistry::builtin().expect("builtin");
        assert_eq!(registry.canonical("leaves"), "leaf");
        assert_eq!(registry.canonical("greenish"), "green");
        assert_eq!(registry.canonical("chartreuse"), "chartreuse");
    }

    #[test]
    fn test_replace_chains_resolve_to_fixed_point() {
        let registry = TermRegistry::new(
            vec![
                term(TermLabel::Color, "a", Some("b")),
                term(TermLabel::Color, "b", Some("c")),
                term(TermLabel::Color, "x", Some("y")),
                term(TermLabel::Color, "y", Some("x")),
            ],
            BTreeMap::new(),
        );
        assert_eq!(registry.canonical("a"), "c");
        let once = registry.canonical("a");
        assert_eq!(registry.canonical(&once), once);
        // cycles stop instead of looping
        assert!(["x", "y"].contains(&registry.canonical("x").as_str()));
    }

    #[test]
    fn test_builtin_lookups() {
        let registry = TermRegistry::builtin().expect("builtin");
        assert_eq!(registry.label("petals"), Some(&TermLabel::Part));
        assert_eq!(registry.label("lobed"), Some(&TermLabel::CountSuffix));
        assert_eq!(registry.canonical("lobed"), "lobe");
        assert_eq!(registry.count_value("three"), Some(3));
        assert_eq!(registry.count_value("leaf"), None);
        assert_eq!(registry.count_value("several"), Some(3));
        assert!(registry.is_indefinite("several"));
        assert!(!registry.is_indefinite("three"));
        assert!(registry.is_removed("pale"));
        assert!(!registry.is_removed("spotted"));
        assert_eq!(registry.category("woody"), Some("woodiness"));
    }

    #[test]
    fn test_mm_factor_accepts_synonyms() {
        let registry = TermRegistry::builtin().expect("builtin");
        assert_eq!(registry.mm_factor("cm"), Some(10.0));
        assert_eq!(registry.mm_factor("centimeters"), Some(10.0));
        assert_eq!(registry.mm_factor("CM"), Some(10.0));
        assert_eq!(registry.mm_factor("in"), None);
    }

    #[test]
    fn test_from_dir_reads_both_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(TERMS_FILE),
            "label,pattern,replace,category\npart,frond,leaf,\n",
        )
        .expect("write terms");
        std::fs::write(dir.path().join(UNITS_FILE), "units,millimeters\nmm,1\n")
            .expect("write units");
        let registry = TermRegistry::from_dir(dir.path()).expect("load");
        assert_eq!(registry.canonical("frond"), "leaf");
        assert_eq!(registry.label_counts().get("part"), Some(&1));
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = TermRegistry::from_dir(dir.path()).unwrap_err();
        assert!(matches!(error, TermsError::Io { .. }));
    }
}
