use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use nodes::webhook::{ReplyBody, WebhookReply};
use nodes::WebhookTrigger;

use super::AppState;

pub async fn handle_webhook(
    Path(path): Path<String>,
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    // 1. Find workflow by webhook path
    let Some(executor) = state.webhook(&path) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no workflow listens on webhook '{path}'") })),
        )
            .into_response();
    };

    // 2. Only POST bodies are read
    let payload = if method == Method::POST {
        match parse_body(&body) {
            Ok(value) => value,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("invalid JSON payload: {e}") })),
                )
                    .into_response();
            }
        }
    } else {
        Value::Null
    };

    let reply = WebhookTrigger::new(path.as_str()).handle(method.as_str(), payload);

    // 3. Reply on receipt; the run continues in the background
    if let Some(items) = reply.workflow_data.clone() {
        info!("webhook '{}' triggered workflow '{}'", path, executor.workflow().name);
        let listener = state.run_listener.clone();
        tokio::spawn(async move {
            let outcome = executor.run(Value::Array(items)).await;
            match &outcome {
                Ok(result) => info!(execution_id = %result.execution_id, "webhook run finished"),
                Err(e) => warn!("webhook run failed: {e}"),
            }
            if let Some(tx) = listener {
                let _ = tx.send(outcome.map_err(|e| e.to_string()));
            }
        });
    }

    into_response(reply)
}

/// An empty body counts as an empty object.
fn parse_body(body: &Bytes) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body)
}

fn into_response(reply: WebhookReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match reply.body {
        ReplyBody::Json(value) => (status, Json(value)).into_response(),
        ReplyBody::Text(text) => (status, text).into_response(),
    }
}
