//! Unauthenticated GET endpoints: service descriptor, liveness, tool list.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::core::mcp::SERVICE_NAME;
use crate::domain::{BOT_TOKEN_HEADER, CHANNEL_IDS_HEADER, SECRET_KEY_HEADER, TEAM_ID_HEADER};
use crate::infra::http_app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub protocol: &'static str,
    pub endpoints: Endpoints,
    #[serde(rename = "requiredHeaders")]
    pub required_headers: RequiredHeaders,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub tools: &'static str,
    pub mcp: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RequiredHeaders {
    #[serde(rename = "x-slack-bot-token")]
    pub bot_token: &'static str,
    #[serde(rename = "x-slack-team-id")]
    pub team_id: &'static str,
    #[serde(rename = "x-slack-channel-ids")]
    pub channel_ids: &'static str,
    #[serde(rename = "x-secret-key")]
    pub secret_key: &'static str,
}

pub async fn root() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: "Remote MCP server exposing Slack tools over HTTP",
        protocol: "MCP over HTTP (JSON-RPC 2.0)",
        endpoints: Endpoints { health: "/health", tools: "/tools", mcp: "/mcp" },
        required_headers: RequiredHeaders {
            bot_token: "Slack bot token (required for tools/call)",
            team_id: "Slack workspace id (required for tools/call)",
            channel_ids: "Optional comma-separated channel ids to restrict channel listing",
            secret_key: "Shared secret (required for tools/call when auth is enabled)",
        },
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", service: SERVICE_NAME })
}

pub async fn tools(State(state): State<AppState>) -> Json<Value> {
    Json(super::mcp::tools_list(&state.registry))
}
