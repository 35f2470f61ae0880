//! Node-level error type.

use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// The engine uses the variant to decide retry behaviour:
/// - `Retryable` — the run re-tries the node with exponential back-off.
/// - everything else — the run is aborted immediately.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NodeError {
    /// Transient failure; the engine should re-try the node.
    #[error("retryable node error: {0}")]
    Retryable(String),

    /// Permanent failure; no retry should be attempted.
    #[error("fatal node error: {0}")]
    Fatal(String),

    /// The node's parameters could not be turned into a working node.
    #[error("invalid node configuration: {0}")]
    InvalidConfig(String),

    /// A gate-mode validator rejected an item.
    #[error("Item failed validation. {summary}")]
    ValidationFailed {
        /// Position of the rejected item in the node's input.
        item_index: usize,
        /// `"<field>: <message>"` entries joined with `" | "`.
        summary: String,
    },
}

impl NodeError {
    /// Whether the engine may re-run the node after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NodeError::Retryable(_))
    }
}
