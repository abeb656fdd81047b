/// Unified error type for the query engine
/// A single kind is surfaced to callers: query parsing failures
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed or semantically invalid query text
    #[error("Failed to parse query: {message}")]
    Parse { message: String },
}

impl EngineError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
