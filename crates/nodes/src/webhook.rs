//! `WebhookTrigger` — starts a workflow from an inbound HTTP POST.
//!
//! The trigger knows nothing about the HTTP server; the api crate hands it the
//! request method and parsed body and sends back whatever reply it produces.

use serde_json::{json, Value};

/// Path used when a workflow does not configure one.
pub const DEFAULT_WEBHOOK_PATH: &str = "custom-webhook";

/// Body of a [`WebhookReply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Json(Value),
    Text(String),
}

/// What the trigger answers and what, if anything, it feeds the workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookReply {
    pub status: u16,
    pub body: ReplyBody,
    /// Items that start the workflow. `None` means nothing is triggered.
    pub workflow_data: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTrigger {
    path: String,
}

impl Default for WebhookTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_WEBHOOK_PATH)
    }
}

impl WebhookTrigger {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Accept POST only; the body becomes the single input item.
    pub fn handle(&self, method: &str, body: Value) -> WebhookReply {
        if method.eq_ignore_ascii_case("POST") {
            WebhookReply {
                status: 200,
                body: ReplyBody::Json(json!({ "success": true })),
                workflow_data: Some(vec![body]),
            }
        } else {
            WebhookReply {
                status: 405,
                body: ReplyBody::Text("Method Not Allowed".into()),
                workflow_data: None,
            }
        }
    }
}
