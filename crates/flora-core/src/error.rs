use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },
    #[error("invalid filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Terms(#[from] flora_terms::TermsError),
    #[error(transparent)]
    Model(#[from] flora_model::ModelError),
}

impl CoreError {
    pub(crate) fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
