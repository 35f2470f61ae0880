//! The `ExecutableNode` trait — the contract every node must fulfil.

use async_trait::async_trait;
use serde_json::Value;

use crate::NodeError;

/// Shared context passed to every node during execution.
///
/// Defined here (in the nodes crate) so both the engine and individual node
/// implementations can import it without a circular dependency.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the parent workflow.
    pub workflow_id: uuid::Uuid,
    /// ID of the current execution run.
    pub execution_id: uuid::Uuid,
    /// Initial input supplied when the execution was triggered.
    pub input: Value,
}

/// The core node trait.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// Execute the node, receive the *previous* node's JSON output as `input`,
    /// and return this node's JSON output.
    async fn execute(
        &self,
        input: Value,
        ctx: &ExecutionContext,
    ) -> Result<Value, NodeError>;
}

/// Split a node input into work items.
///
/// Arrays yield their elements; any other value is a single item.
pub fn into_items(input: Value) -> Vec<Value> {
    match input {
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_input_yields_its_elements() {
        let items = into_items(json!([{ "a": 1 }, { "b": 2 }]));
        assert_eq!(items, vec![json!({ "a": 1 }), json!({ "b": 2 })]);
    }

    #[test]
    fn scalar_or_object_input_is_one_item() {
        assert_eq!(into_items(json!({ "a": 1 })), vec![json!({ "a": 1 })]);
        assert_eq!(into_items(Value::Null), vec![Value::Null]);
    }
}
