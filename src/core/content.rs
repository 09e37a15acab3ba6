//! Content model for `tools/call` results.

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::core::error::GatewayError;

/// What running a tool produced. A failed run is still a `result` on the
/// wire; only its payload differs.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(JsonValue),
    Failed(String),
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }

    pub fn payload(&self) -> JsonValue {
        match self {
            ToolOutcome::Success(v) => v.clone(),
            ToolOutcome::Failed(message) => json!({ "error": message, "status": "failed" }),
        }
    }

    pub fn into_result(self) -> CallToolResult {
        let payload = self.payload();
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        CallToolResult { content: vec![TextContent::new(text)] }
    }
}

impl From<Result<JsonValue, GatewayError>> for ToolOutcome {
    fn from(res: Result<JsonValue, GatewayError>) -> Self {
        match res {
            Ok(v) => ToolOutcome::Success(v),
            Err(e) => ToolOutcome::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CallToolResult {
    pub content: Vec<TextContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { kind: "text", text: text.into() }
    }
}
