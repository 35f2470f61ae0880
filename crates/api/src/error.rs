//! API-level error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Two webhook workflows claim the same path.
    #[error("webhook path '{0}' is used by more than one workflow")]
    DuplicateWebhookPath(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}
