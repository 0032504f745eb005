//! Error type shared by all formats and the registry

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    /// No format registered under this name
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// The format exists but lacks the requested direction
    #[error("{0}")]
    NotSupported(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Reading the source or writing the sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
