use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use engine::{ExecutionResult, SharedExecutor, WorkflowExecutor};

use crate::ApiError;

pub mod webhooks;

/// Outcome of a webhook-triggered run, reported to an optional listener.
pub type RunOutcome = Result<ExecutionResult, String>;

/// Shared handler state: webhook-triggered workflows keyed by path.
#[derive(Clone, Default)]
pub struct AppState {
    webhooks: Arc<HashMap<String, SharedExecutor>>,
    run_listener: Option<UnboundedSender<RunOutcome>>,
}

impl AppState {
    /// Index executors by webhook path. Manually triggered workflows are skipped.
    pub fn new(executors: Vec<WorkflowExecutor>) -> Result<Self, ApiError> {
        let mut webhooks = HashMap::new();
        for executor in executors {
            let Some(path) = executor.workflow().webhook_path().map(str::to_owned) else {
                warn!(
                    "workflow '{}' is not webhook-triggered; not exposing it",
                    executor.workflow().name
                );
                continue;
            };
            if webhooks.contains_key(&path) {
                return Err(ApiError::DuplicateWebhookPath(path));
            }
            webhooks.insert(path, Arc::new(executor));
        }
        Ok(Self {
            webhooks: Arc::new(webhooks),
            run_listener: None,
        })
    }

    /// Send the outcome of every triggered run to `tx`.
    pub fn with_run_listener(mut self, tx: UnboundedSender<RunOutcome>) -> Self {
        self.run_listener = Some(tx);
        self
    }

    pub fn webhook(&self, path: &str) -> Option<SharedExecutor> {
        self.webhooks.get(path).cloned()
    }

    pub fn webhook_paths(&self) -> impl Iterator<Item = &str> {
        self.webhooks.keys().map(String::as_str)
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
