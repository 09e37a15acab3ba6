use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Default to info level; allow override via RUST_LOG (e.g., "debug").
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Count a finished tool call by tool name and outcome.
pub fn record_tool_call(tool: &str, outcome: &'static str) {
    metrics::counter!("mcp_tool_calls_total", "tool" => tool.to_string(), "outcome" => outcome)
        .increment(1);
}

/// Record latency for one Slack API call.
pub fn record_upstream(method: &'static str, elapsed_ms: f64, ok: bool) {
    metrics::histogram!("slack_upstream_latency_ms", "method" => method).record(elapsed_ms);
    if !ok {
        metrics::counter!("slack_upstream_errors_total", "method" => method).increment(1);
    }
    tracing::debug!(method, elapsed_ms, ok, "slack upstream call");
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "request summary"
    );
    if status.as_u16() == 401 {
        tracing::warn!(method = %method, path = %path, "authentication failure");
    }

    response
}
