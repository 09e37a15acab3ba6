use async_trait::async_trait;
use serde::Serialize;

use crate::clients::slack::SlackClient;
use crate::core::error::GatewayError;

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
}

/// Tool = Spec + a single call against the Slack client it is handed.
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl ToolMeta {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        }
    }
}

/// Deserialize a tool's argument object, treating `null` as `{}`.
pub fn parse_args<T: serde::de::DeserializeOwned>(
    arguments: &serde_json::Value,
) -> Result<T, GatewayError> {
    let value = if arguments.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        arguments.clone()
    };
    Ok(serde_json::from_value(value)?)
}

/// Page sizes are declared as JSON `number`, so `10.0` is as good as `10`.
/// Fractions are truncated; negatives and non-numbers are rejected.
pub fn number_as_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let n = <f64 as serde::Deserialize>::deserialize(deserializer)?;
    if !n.is_finite() || n < 0.0 {
        return Err(D::Error::custom(format!("expected a non-negative number, got {n}")));
    }
    Ok(n.trunc().min(f64::from(u32::MAX)) as u32)
}

/// Reject empty strings for fields the upstream call cannot do without.
pub fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), GatewayError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| *k)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::InvalidArguments(format!(
            "missing required arguments: {}",
            missing.join(", ")
        )))
    }
}
