use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid span {start}..{end} for text of {len} characters")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("unknown term label: {0}")]
    UnknownLabel(String),
    #[error("unknown trait kind: {0}")]
    UnknownTraitKind(String),
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),
    #[error("dependency head {head} out of range for token {index}")]
    InvalidHead { index: usize, head: usize },
    #[error("dependency cycle through token {0}")]
    DependencyCycle(usize),
}

pub type Result<T> = std::result::Result<T, ModelError>;
