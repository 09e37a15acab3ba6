use thiserror::Error;

/// Failures while running a tool. All of them end up as a soft-failure
/// payload, never as a JSON-RPC error.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::InvalidArguments(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_arguments_are_prefixed() {
        let e = GatewayError::InvalidArguments("missing required arguments: text".into());
        assert_eq!(e.to_string(), "Invalid arguments: missing required arguments: text");
    }

    #[test]
    fn unknown_tool_names_the_tool() {
        let e = GatewayError::UnknownTool("slack_nonexistent".into());
        assert_eq!(e.to_string(), "Unknown tool: slack_nonexistent");
    }

    #[test]
    fn serde_errors_become_invalid_arguments() {
        let e: GatewayError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(e, GatewayError::InvalidArguments(_)));
        assert!(e.to_string().starts_with("Invalid arguments:"));
    }
}
