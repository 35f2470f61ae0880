//! Core domain models for the workflow engine.
//!
//! A workflow is an ordered list of nodes started by a trigger. Definitions
//! are plain JSON so they can be loaded from disk by the CLI.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// How a workflow is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Triggered by an incoming HTTP POST to `/webhook/{path}`.
    Webhook {
        /// URL path segment that identifies this workflow.
        #[serde(default = "default_webhook_path")]
        path: String,
    },
    /// Triggered manually from the CLI.
    Manual,
}

fn default_webhook_path() -> String {
    nodes::webhook::DEFAULT_WEBHOOK_PATH.to_owned()
}

// ---------------------------------------------------------------------------
// NodeDefinition
// ---------------------------------------------------------------------------

/// A single step in the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Unique identifier within this workflow.
    pub id: String,
    /// Maps to a built-in node implementation, see [`crate::registry`].
    pub node_type: String,
    /// Node parameters passed to the implementation when it is built.
    #[serde(default)]
    pub config: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A complete workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub trigger: Trigger,
    /// Executed in declaration order; each node receives its predecessor's output.
    pub nodes: Vec<NodeDefinition>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, trigger: Trigger, nodes: Vec<NodeDefinition>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            trigger,
            nodes,
        }
    }

    /// Parse a workflow definition from JSON text.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::InvalidDefinition(e.to_string()))
    }

    /// The webhook path, if this workflow is webhook-triggered.
    pub fn webhook_path(&self) -> Option<&str> {
        match &self.trigger {
            Trigger::Webhook { path } => Some(path),
            Trigger::Manual => None,
        }
    }

    /// Check the definition before building nodes.
    ///
    /// # Errors
    /// - [`EngineError::EmptyWorkflow`] if there are no nodes.
    /// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.nodes.is_empty() {
            return Err(EngineError::EmptyWorkflow);
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        for node in &self.nodes {
            if !seen_ids.insert(node.id.as_str()) {
                return Err(EngineError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(())
    }
}
