use reqwest::RequestBuilder;

/// Generate a simple request id suitable for logging/correlation.
pub fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("slk-{}-{}", now.as_secs(), now.subsec_nanos())
}

pub fn user_agent() -> String {
    format!("mcp-slack-server/{}", env!("CARGO_PKG_VERSION"))
}

/// Add bearer auth plus the standard headers to an outgoing Slack request.
/// Returns the updated builder and the request id used.
pub fn add_standard_headers(
    builder: RequestBuilder,
    bot_token: &str,
    request_id: Option<String>,
) -> (RequestBuilder, String) {
    let rid = request_id.unwrap_or_else(generate_request_id);
    let b = builder
        .bearer_auth(bot_token)
        .header("x-request-id", rid.as_str())
        .header(reqwest::header::USER_AGENT, user_agent());
    (b, rid)
}
