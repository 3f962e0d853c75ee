//! Lookup tables for trait extraction: the term vocabulary with its
//! synonym-to-canonical map, count words and unit conversion factors.
//!
//! Tables live as CSV under the workspace `terms/` directory and are compiled
//! in. A directory given explicitly or through `FLORA_TERMS_DIR` replaces them.

pub mod error;
pub mod loaders;
pub mod paths;
pub mod registry;

pub use error::{Result, TermsError};
pub use loaders::{TermRow, load_term_rows, load_unit_factors};
pub use paths::{TERMS_ENV_VAR, TERMS_FILE, UNITS_FILE, terms_dir_override, workspace_terms_dir};
pub use registry::{INDEFINITE_CATEGORY, REMOVE_CATEGORY, Term, TermRegistry};
