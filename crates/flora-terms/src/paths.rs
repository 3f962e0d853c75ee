//! Vocabulary directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the vocabulary directory.
pub const TERMS_ENV_VAR: &str = "FLORA_TERMS_DIR";

/// File holding the term vocabulary.
pub const TERMS_FILE: &str = "terms.csv";

/// File holding unit conversion factors.
pub const UNITS_FILE: &str = "units.csv";

/// Directory named by `FLORA_TERMS_DIR`, if set.
pub fn terms_dir_override() -> Option<PathBuf> {
    std::env::var_os(TERMS_ENV_VAR).map(PathBuf::from)
}

/// `terms/` directory relative to the workspace root.
///
/// The built-in tables are compiled in from this directory; it is only read
/// at runtime when passed to [`crate::TermRegistry::from_dir`].
pub fn workspace_terms_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../terms")
}
