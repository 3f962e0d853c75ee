use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cli::OutputFormatArg;

#[derive(Debug)]
pub struct ExtractResult {
    pub format: OutputFormatArg,
    /// `None` when the output went to stdout.
    pub output: Option<PathBuf>,
    pub documents: Vec<DocumentSummary>,
    /// Files left out by the genus filter.
    pub skipped: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug)]
pub struct DocumentSummary {
    pub id: String,
    pub sentences: usize,
    pub traits: usize,
    /// Record count per trait kind.
    pub kinds: BTreeMap<String, usize>,
}
