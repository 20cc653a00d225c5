//! Edge Source Error Types

use thiserror::Error;

/// Errors raised while producing edges
#[derive(Debug, Error)]
pub enum SourceError {
    /// Capture file or thread I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed capture line
    #[error("Capture line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Source has no more edges
    #[error("Edge source closed")]
    Closed,
}
