//! `engine` crate — workflow models, node registry, and the execution engine.

pub mod models;
pub mod error;
pub mod registry;
pub mod executor;

pub use models::{Workflow, Trigger, NodeDefinition};
pub use error::EngineError;
pub use executor::{ExecutionResult, ExecutorConfig, SharedExecutor, WorkflowExecutor};
