//! Error types for ticketseq.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level result type for ticketseq operations.
pub type Result<T> = std::result::Result<T, TicketError>;

/// Top-level error type for ticketseq.
///
/// Every variant is fatal to a run. Conditions the tool tolerates (a
/// document without a ticket field, a primary without a counterpart) are
/// not errors and never appear here.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse counter record {path}: {message}")]
    CounterParse { path: PathBuf, message: String },

    #[error("counter record entry for '{prefix}' is malformed: {message}")]
    CounterShape { prefix: String, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid file pattern: {0}")]
    Pattern(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TicketError {
    /// Wrap an [`std::io::Error`] with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
