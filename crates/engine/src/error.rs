//! Engine-level error types.

use thiserror::Error;

/// Errors produced by the workflow engine (definition checks + execution).
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Definition errors ------

    /// The workflow JSON could not be parsed.
    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(String),

    /// The workflow has no nodes to run.
    #[error("workflow has no nodes")]
    EmptyWorkflow,

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// No built-in implementation exists for a node type.
    #[error("node '{node_id}' has unknown node_type '{node_type}'")]
    UnknownNodeType {
        node_id: String,
        node_type: String,
    },

    /// The node's config was rejected by its implementation.
    #[error("node '{node_id}' could not be built: {source}")]
    NodeConfig {
        node_id: String,
        #[source]
        source: nodes::NodeError,
    },

    // ------ Execution errors ------

    /// A node failed with a non-retryable error; the whole execution is aborted.
    #[error("node '{node_id}' failed fatally: {message}")]
    NodeFatal {
        node_id: String,
        message: String,
    },

    /// A node's retryable error was exhausted.
    #[error("node '{node_id}' exceeded retry limit: {message}")]
    NodeRetryExhausted {
        node_id: String,
        message: String,
    },
}
