//! `ValidatorNode` — runs the field validator once per work item.
//!
//! In annotate mode (`output-validation`) every item is forwarded with its
//! `isValid`/`errors` attached. In gate mode (`output-items`) valid items pass
//! through untouched and the first invalid item aborts the node.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::traits::{into_items, ExecutionContext};
use crate::validation::{validate, FieldDescriptor, ValidationResult};
use crate::{ExecutableNode, NodeError};

/// What the node does with each item's validation result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ValidatorMode {
    /// Attach the result to the item and always forward it.
    #[default]
    #[serde(rename = "output-validation", alias = "annotate")]
    Annotate,
    /// Forward valid items unchanged; fail on the first invalid one.
    #[serde(rename = "output-items", alias = "gate")]
    Gate,
}

/// Where the field descriptors for an item come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// The same configured list for every item.
    Static(Vec<FieldDescriptor>),
    /// A descriptor list read from each item at a JSON pointer.
    Item(String),
}

/// Node parameters as stored by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    #[serde(default)]
    pub node_mode: ValidatorMode,
    #[serde(default)]
    pub inputs: ValidatorInputs,
    #[serde(default)]
    pub fields_pointer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorInputs {
    #[serde(default)]
    pub input_fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone)]
pub struct ValidatorNode {
    mode: ValidatorMode,
    fields: FieldSource,
}

impl ValidatorNode {
    pub fn new(mode: ValidatorMode, fields: FieldSource) -> Self {
        Self { mode, fields }
    }

    /// Build the node from its JSON parameters. `null` means defaults.
    pub fn from_config(config: &Value) -> Result<Self, NodeError> {
        let config: ValidatorConfig = if config.is_null() {
            ValidatorConfig::default()
        } else {
            ValidatorConfig::deserialize(config)
                .map_err(|e| NodeError::InvalidConfig(e.to_string()))?
        };
        Ok(Self::from(config))
    }

    pub fn mode(&self) -> ValidatorMode {
        self.mode
    }

    /// Resolve the descriptors that apply to one item.
    fn fields_for(&self, item: &Value, index: usize) -> Result<Vec<FieldDescriptor>, NodeError> {
        match &self.fields {
            FieldSource::Static(fields) => Ok(fields.clone()),
            FieldSource::Item(pointer) => match item.pointer(pointer) {
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(raw) => Vec::<FieldDescriptor>::deserialize(raw).map_err(|e| {
                    NodeError::Fatal(format!(
                        "item {index}: invalid field descriptors at '{pointer}': {e}"
                    ))
                }),
            },
        }
    }
}

impl From<ValidatorConfig> for ValidatorNode {
    fn from(config: ValidatorConfig) -> Self {
        let fields = match config.fields_pointer {
            Some(pointer) => FieldSource::Item(pointer),
            None => FieldSource::Static(config.inputs.input_fields),
        };
        Self::new(config.node_mode, fields)
    }
}

#[async_trait]
impl ExecutableNode for ValidatorNode {
    async fn execute(&self, input: Value, ctx: &ExecutionContext) -> Result<Value, NodeError> {
        let items = into_items(input);
        let mut output = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let fields = self.fields_for(&item, index)?;
            let result = validate(&fields);
            debug!(
                execution_id = %ctx.execution_id,
                item = index,
                valid = result.is_valid,
                errors = result.errors.len(),
                "validated item"
            );

            match self.mode {
                ValidatorMode::Annotate => output.push(annotate(item, &result)),
                ValidatorMode::Gate if result.is_valid => output.push(item),
                ValidatorMode::Gate => {
                    return Err(NodeError::ValidationFailed {
                        item_index: index,
                        summary: result.summary(),
                    });
                }
            }
        }

        Ok(Value::Array(output))
    }
}

/// Merge `isValid`/`errors` into an object item; replace anything else.
fn annotate(item: Value, result: &ValidationResult) -> Value {
    let mut fields = match item {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    fields.insert("isValid".into(), Value::Bool(result.is_valid));
    if result.errors.is_empty() {
        fields.remove("errors");
    } else {
        fields.insert(
            "errors".into(),
            serde_json::to_value(&result.errors).unwrap_or(Value::Null),
        );
    }
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ExecutionContext {
        ExecutionContext {
            workflow_id: uuid::Uuid::new_v4(),
            execution_id: uuid::Uuid::new_v4(),
            input: Value::Null,
        }
    }

    fn node(mode: &str, fields: Value) -> ValidatorNode {
        ValidatorNode::from_config(&json!({
            "nodeMode": mode,
            "inputs": { "inputFields": fields }
        }))
        .expect("config should parse")
    }

    #[test]
    fn config_defaults_to_annotate_with_no_fields() {
        let node = ValidatorNode::from_config(&Value::Null).unwrap();
        assert_eq!(node.mode(), ValidatorMode::Annotate);
        assert_eq!(node.fields, FieldSource::Static(vec![]));

        let node = ValidatorNode::from_config(&json!({ "nodeMode": "gate" })).unwrap();
        assert_eq!(node.mode(), ValidatorMode::Gate);
    }

    #[test]
    fn bad_config_is_rejected() {
        let err = ValidatorNode::from_config(&json!({ "nodeMode": "shout" })).unwrap_err();
        assert!(matches!(err, NodeError::InvalidConfig(_)));

        let err = ValidatorNode::from_config(&json!({
            "inputs": { "inputFields": [{ "validationType": "colour" }] }
        }))
        .unwrap_err();
        assert!(matches!(err, NodeError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn annotate_mode_merges_results_into_items() {
        let node = node(
            "output-validation",
            json!([{ "name": "mail", "validationType": "string", "stringFormat": "email",
                     "stringData": "not-an-email" }]),
        );
        let out = node
            .execute(json!([{ "id": 1, "errors": "stale" }, "scalar"]), &ctx())
            .await
            .unwrap();

        assert_eq!(
            out,
            json!([
                { "id": 1, "isValid": false,
                  "errors": [{ "field": "mail", "message": "Invalid email format" }] },
                { "isValid": false,
                  "errors": [{ "field": "mail", "message": "Invalid email format" }] }
            ])
        );
    }

    #[tokio::test]
    async fn annotate_mode_omits_errors_when_valid() {
        let node = node(
            "output-validation",
            json!([{ "validationType": "boolean", "required": true, "booleanData": false }]),
        );
        let out = node.execute(json!({ "id": 7, "errors": [] }), &ctx()).await.unwrap();
        assert_eq!(out, json!([{ "id": 7, "isValid": true }]));
    }

    #[tokio::test]
    async fn gate_mode_forwards_valid_items_unchanged() {
        let node = node(
            "output-items",
            json!([{ "name": "color", "validationType": "enum", "stringData": "red",
                     "enumValues": "red, green, blue" }]),
        );
        let out = node.execute(json!([{ "a": 1 }, { "b": 2 }]), &ctx()).await.unwrap();
        assert_eq!(out, json!([{ "a": 1 }, { "b": 2 }]));
    }

    #[tokio::test]
    async fn gate_mode_fails_with_combined_message() {
        let node = node(
            "output-items",
            json!([
                { "name": "title", "validationType": "string", "required": true },
                { "name": "age", "validationType": "number", "numberData": 5,
                  "numberValidationType": "range", "minValue": 10, "maxValue": 20 },
                { "validationType": "date", "dateData": "yesterday" }
            ]),
        );
        let err = node.execute(json!([{ "x": 1 }]), &ctx()).await.unwrap_err();
        assert_eq!(
            err,
            NodeError::ValidationFailed {
                item_index: 0,
                summary: "title: String cannot be empty | age: Value must be between 10 and 20 | Invalid date format".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Item failed validation. title: String cannot be empty | age: Value must be between 10 and 20 | Invalid date format"
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn blank_field_names_leave_errors_unlabelled() {
        let node = node(
            "output-items",
            json!([
                { "name": "  ", "validationType": "boolean", "required": true },
                { "name": "", "validationType": "number", "numberData": 25,
                  "numberValidationType": "range", "maxValue": 20 }
            ]),
        );
        let err = node.execute(json!({}), &ctx()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Item failed validation. Value must be a boolean | Value must be between -inf and 20"
        );
    }

    #[tokio::test]
    async fn descriptors_can_be_read_from_each_item() {
        let node = ValidatorNode::from_config(&json!({
            "nodeMode": "output-validation",
            "fieldsPointer": "/checks"
        }))
        .unwrap();

        let input = json!([
            { "checks": [{ "name": "n", "validationType": "number", "numberData": "abc" }] },
            { "checks": [{ "name": "n", "validationType": "number", "numberData": 4 }] },
            { "other": true }
        ]);
        let out = node.execute(input, &ctx()).await.unwrap();
        assert_eq!(out[0]["isValid"], json!(false));
        assert_eq!(out[0]["errors"][0]["message"], json!("Value must be a valid number"));
        assert_eq!(out[1]["isValid"], json!(true));
        assert_eq!(out[2]["isValid"], json!(true));
    }

    #[tokio::test]
    async fn malformed_item_descriptors_are_fatal() {
        let node = ValidatorNode::new(ValidatorMode::Annotate, FieldSource::Item("/checks".into()));
        let err = node
            .execute(json!([{ "checks": [{ "validationType": 3 }] }]), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::Fatal(msg) if msg.starts_with("item 0:")));
    }
}
