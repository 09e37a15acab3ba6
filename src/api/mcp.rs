use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value as J};

use crate::clients::slack::SlackClient;
use crate::core::content::ToolOutcome;
use crate::core::mcp::{
    err as rpc_err, id_of, ok as rpc_ok, InitializeResult, RpcReq, RpcResp, INTERNAL_ERROR,
    INVALID_PARAMS, METHOD_NOT_FOUND,
};
use crate::domain::SlackCredentials;
use crate::infra::auth::MAX_BODY_BYTES;
use crate::infra::http::json as http_json;
use crate::infra::http_app::AppState;
use crate::infra::logging::record_tool_call;
use crate::tools::registry::ToolRegistry;

pub const MISSING_CREDENTIALS: &str = "Missing required Slack credentials. Please provide \
x-slack-bot-token and x-slack-team-id headers.";

pub fn tools_list(reg: &ToolRegistry) -> J {
    json!({ "tools": reg.list() })
}

// HTTP handler
pub async fn http(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Json<RpcResp> {
    // Same limit as the auth gate, so oversized bodies get one answer
    // whatever the auth setup.
    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable JSON-RPC body");
            return http_json::internal_error(J::Null, e);
        }
    };
    let raw: J = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable JSON-RPC body");
            return http_json::internal_error(J::Null, e);
        }
    };
    // The gate reads the method from an object only; anything else must not
    // reach dispatch.
    if !raw.is_object() {
        return http_json::internal_error(J::Null, "request must be a JSON object");
    }
    let id = id_of(&raw);
    let req: RpcReq = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => return http_json::internal_error(id, e),
    };
    tracing::debug!(method = %req.method, id = ?req.id, "HTTP handler invoked");

    let resp = handle(&state, &headers, req).await;
    tracing::trace!(response = ?resp, "HTTP handler completed");
    Json(resp)
}

/// Dispatch one request. Every outcome, including failures, is a response
/// carrying the request's id.
pub async fn handle(state: &AppState, headers: &HeaderMap, req: RpcReq) -> RpcResp {
    let id = req.id;
    match req.method.as_str() {
        "initialize" => match serde_json::to_value(InitializeResult::current()) {
            Ok(result) => rpc_ok(id, result),
            Err(e) => rpc_err(id, INTERNAL_ERROR, format!("Internal error: {e}"), None),
        },
        "tools/list" => rpc_ok(id, tools_list(&state.registry)),
        "tools/call" => call_tool(state, headers, id, &req.params).await,
        other => rpc_err(id, METHOD_NOT_FOUND, format!("Method not found: {other}"), None),
    }
}

async fn call_tool(state: &AppState, headers: &HeaderMap, id: J, params: &J) -> RpcResp {
    let Some(credentials) = SlackCredentials::from_headers(headers) else {
        tracing::warn!("tools/call without Slack credentials");
        return rpc_err(id, INVALID_PARAMS, MISSING_CREDENTIALS, None);
    };
    let Some(name) = params.get("name").and_then(J::as_str) else {
        return rpc_err(id, INVALID_PARAMS, "Invalid params: missing tool name", None);
    };
    let args = params.get("arguments").unwrap_or(&J::Null);

    let client = match SlackClient::new(state.config.slack_api_base.as_str(), credentials) {
        Ok(c) => c,
        Err(e) => return rpc_err(id, INTERNAL_ERROR, format!("Internal error: {e}"), None),
    };

    let outcome: ToolOutcome = state.registry.call(name, &client, args).await.into();
    if outcome.is_success() {
        record_tool_call(name, "success");
        tracing::info!(tool = name, "tool call succeeded");
    } else {
        record_tool_call(name, "failed");
        tracing::warn!(tool = name, payload = %outcome.payload(), "tool call failed");
    }

    match serde_json::to_value(outcome.into_result()) {
        Ok(result) => rpc_ok(id, result),
        Err(e) => rpc_err(id, INTERNAL_ERROR, format!("Internal error: {e}"), None),
    }
}
