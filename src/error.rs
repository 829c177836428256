use thiserror::Error;

/// Unified error type for timever operations
#[derive(Error, Debug)]
pub enum TimeverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Template error: {0}")]
    Template(String),
}

/// Convenience type alias for Results in timever
pub type Result<T> = std::result::Result<T, TimeverError>;

impl TimeverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TimeverError::Config(msg.into())
    }

    /// Create a version format error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TimeverError::InvalidVersionFormat(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        TimeverError::Precondition(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        TimeverError::Template(msg.into())
    }
}

impl From<toml::de::Error> for TimeverError {
    fn from(err: toml::de::Error) -> Self {
        TimeverError::Config(err.to_string())
    }
}
