//! Workflow execution engine.
//!
//! `WorkflowExecutor` is the central orchestrator:
//! 1. Checks the workflow definition and builds its nodes once.
//! 2. Iterates through nodes in declaration order, dispatching each via `ExecutableNode`.
//! 3. Passes the previous node's JSON output as input to the next node.
//! 4. Handles `NodeError::Retryable` (up to `max_retries`); every other
//!    node error aborts the run immediately.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use nodes::{ExecutableNode, ExecutionContext, NodeError};

use crate::registry::{build_registry, NodeRegistry};
use crate::{EngineError, Workflow};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of times a retryable node failure will be retried.
    pub max_retries: u32,
    /// Base delay for exponential back-off between retries.
    pub retry_base_delay: Duration,
}

/// Upper bound on any single back-off sleep.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt - 1)`,
/// capped at [`MAX_RETRY_DELAY`].
pub(crate) fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32
        .checked_pow(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_base_delay: Duration::from_millis(100),
        }
    }
}

// ---------------------------------------------------------------------------
// Output of a completed execution
// ---------------------------------------------------------------------------

/// The result of running a full workflow.
#[derive(Debug)]
pub struct ExecutionResult {
    /// ID assigned to this run.
    pub execution_id: Uuid,
    /// The JSON output produced by the *last* node.
    pub output: Value,
}

// ---------------------------------------------------------------------------
// WorkflowExecutor
// ---------------------------------------------------------------------------

/// Runs executions of one workflow.
///
/// Nodes are built once at construction; [`WorkflowExecutor::run`] may be
/// called concurrently from several tasks.
pub struct WorkflowExecutor {
    workflow: Workflow,
    registry: NodeRegistry,
    config: ExecutorConfig,
}

impl WorkflowExecutor {
    /// Check the workflow and build its nodes.
    ///
    /// # Errors
    /// Definition problems, unknown node types and rejected node configs.
    pub fn new(workflow: Workflow, config: ExecutorConfig) -> Result<Self, EngineError> {
        workflow.validate()?;
        let registry = build_registry(&workflow.nodes)?;
        Ok(Self { workflow, registry, config })
    }

    /// Use pre-built node implementations instead of the built-in registry.
    pub fn with_registry(
        workflow: Workflow,
        registry: NodeRegistry,
        config: ExecutorConfig,
    ) -> Result<Self, EngineError> {
        workflow.validate()?;
        Ok(Self { workflow, registry, config })
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Run the workflow and return the final output.
    ///
    /// # Errors
    /// Returns `EngineError` for fatal node errors or retry exhaustion.
    #[instrument(skip(self, initial_input), fields(workflow_id = %self.workflow.id, workflow = %self.workflow.name))]
    pub async fn run(&self, initial_input: Value) -> Result<ExecutionResult, EngineError> {
        let execution_id = Uuid::new_v4();
        info!(
            "executing {} nodes as execution {}",
            self.registry.len(),
            execution_id
        );

        let ctx = ExecutionContext {
            workflow_id: self.workflow.id,
            execution_id,
            input: initial_input.clone(),
        };

        let mut current_input = initial_input;

        for (node_id, node_impl) in &self.registry {
            match self
                .execute_with_retry(node_id, node_impl.as_ref(), current_input, &ctx)
                .await
            {
                Ok(output) => {
                    info!("node '{}' succeeded", node_id);
                    current_input = output;
                }
                Err(engine_err) => {
                    error!("node '{}' failed: {}", node_id, engine_err);
                    return Err(engine_err);
                }
            }
        }

        info!("workflow '{}' execution {} succeeded", self.workflow.id, execution_id);

        Ok(ExecutionResult {
            execution_id,
            output: current_input,
        })
    }

    // -----------------------------------------------------------------------
    // Internal: execute a single node with retry logic.
    // -----------------------------------------------------------------------

    async fn execute_with_retry(
        &self,
        node_id: &str,
        node: &dyn ExecutableNode,
        input: Value,
        ctx: &ExecutionContext,
    ) -> Result<Value, EngineError> {
        let mut attempts = 0u32;

        loop {
            match node.execute(input.clone(), ctx).await {
                Ok(output) => return Ok(output),

                Err(NodeError::Retryable(msg)) => {
                    attempts += 1;
                    if attempts > self.config.max_retries {
                        return Err(EngineError::NodeRetryExhausted {
                            node_id: node_id.to_owned(),
                            message: msg,
                        });
                    }

                    let delay = backoff_delay(self.config.retry_base_delay, attempts);

                    warn!(
                        "node '{}' retryable error (attempt {}/{}), retrying in {:?}: {}",
                        node_id, attempts, self.config.max_retries, delay, msg
                    );

                    tokio::time::sleep(delay).await;
                }

                Err(NodeError::Fatal(msg)) => {
                    return Err(EngineError::NodeFatal {
                        node_id: node_id.to_owned(),
                        message: msg,
                    });
                }

                Err(other) => {
                    return Err(EngineError::NodeFatal {
                        node_id: node_id.to_owned(),
                        message: other.to_string(),
                    });
                }
            }
        }
    }
}

/// Shared handle used by the HTTP layer.
pub type SharedExecutor = Arc<WorkflowExecutor>;
