use axum::{http::StatusCode, Json};

use crate::core::mcp::{err as rpc_err, RpcResp, AUTH_REQUIRED, INTERNAL_ERROR};

pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Json<RpcResp> {
    Json(rpc_err(id, code, message, None))
}

/// `-32603` with the cause appended; still delivered with HTTP 200.
pub fn internal_error(id: serde_json::Value, message: impl std::fmt::Display) -> Json<RpcResp> {
    error(id, INTERNAL_ERROR, format!("Internal error: {message}"))
}

/// The only non-200 JSON-RPC response the service sends.
pub fn unauthorized(
    id: serde_json::Value,
    message: impl Into<String>,
) -> (StatusCode, Json<RpcResp>) {
    (StatusCode::UNAUTHORIZED, error(id, AUTH_REQUIRED, message))
}
