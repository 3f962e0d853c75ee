#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TermsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("missing column {column} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("unknown label {label:?} in {path} line {line}")]
    UnknownLabel {
        path: PathBuf,
        line: usize,
        label: String,
    },

    #[error("invalid number {value:?} in {path} line {line}")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("empty pattern in {path} line {line}")]
    EmptyPattern { path: PathBuf, line: usize },
}

impl TermsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TermsError>;
