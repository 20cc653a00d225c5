//! API Error Types

use thiserror::Error;

/// Errors while starting or running the monitor
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Logging could not be initialized
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Prometheus recorder could not be installed
    #[error("Metrics setup failed: {0}")]
    Metrics(String),

    /// Edge source failed to start
    #[error("Edge source error: {0}")]
    Source(#[from] edge_source::SourceError),

    /// Listener or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
