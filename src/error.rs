use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Object not found: {container}/{key}")]
    NotFound { container: String, key: String },

    #[error("Malformed fund identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Record #{index} is missing required field '{field}'")]
    FieldMissing { index: usize, field: String },

    #[error("Invalid quarter '{0}': expected '<year> Q<n>'")]
    InvalidQuarter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM API error: {0}")]
    Api(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "anthropic")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl InsightError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
