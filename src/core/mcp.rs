//! Shared MCP protocol surface: JSON-RPC envelopes and the initialize descriptor.

use serde::{Deserialize, Serialize};
use serde_json::Value as J;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVICE_NAME: &str = "mcp-slack-server";

pub const AUTH_REQUIRED: i32 = -32001;
pub const INVALID_PARAMS: i32 = -32602;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

// --- JSON-RPC structures ---

/// Inbound request. Everything but the shape is optional so that dispatch,
/// not deserialization, decides how to answer an odd request.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RpcReq {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: J,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: J,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResp {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
    pub id: J,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp { jsonrpc: JSONRPC_VERSION.into(), id, result: Some(result), error: None }
}

pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp {
        jsonrpc: JSONRPC_VERSION.into(),
        id,
        result: None,
        error: Some(RpcErr { code, message: msg.into(), data }),
    }
}

/// Pull the `id` out of a raw body without requiring the rest to be valid.
pub fn id_of(body: &J) -> J {
    body.get("id").cloned().unwrap_or(J::Null)
}

// --- Initialize result ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ServerCapabilities {
    pub tools: serde_json::Map<String, J>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl InitializeResult {
    pub fn current() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.into(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo {
                name: SERVICE_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
        }
    }
}
