//! Builds node implementations from their definitions.

use std::sync::Arc;

use nodes::{ExecutableNode, ValidatorNode};

use crate::models::NodeDefinition;
use crate::EngineError;

/// `node_type` of the built-in validator.
pub const VALIDATOR_NODE_TYPE: &str = "validator";

/// Node implementations in execution order, paired with their IDs.
pub type NodeRegistry = Vec<(String, Arc<dyn ExecutableNode>)>;

/// Instantiate one node from its definition.
pub fn build_node(def: &NodeDefinition) -> Result<Arc<dyn ExecutableNode>, EngineError> {
    match def.node_type.as_str() {
        VALIDATOR_NODE_TYPE => {
            let node = ValidatorNode::from_config(&def.config).map_err(|source| {
                EngineError::NodeConfig {
                    node_id: def.id.clone(),
                    source,
                }
            })?;
            Ok(Arc::new(node))
        }
        other => Err(EngineError::UnknownNodeType {
            node_id: def.id.clone(),
            node_type: other.to_owned(),
        }),
    }
}

/// Instantiate every node of a workflow, keeping declaration order.
pub fn build_registry(defs: &[NodeDefinition]) -> Result<NodeRegistry, EngineError> {
    defs.iter()
        .map(|def| Ok((def.id.clone(), build_node(def)?)))
        .collect()
}
