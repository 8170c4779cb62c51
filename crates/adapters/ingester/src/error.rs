//! Ingester adapter error types.

use plant_collector_domain::error::ReportError;

/// Errors specific to the HTTP ingester.
#[derive(Debug, thiserror::Error)]
pub enum IngesterError {
    /// The HTTP client failed to build, send, or receive.
    #[error("HTTP client error")]
    Client(#[from] reqwest::Error),
}

impl From<IngesterError> for ReportError {
    fn from(err: IngesterError) -> Self {
        ReportError::Transport(Box::new(err))
    }
}
