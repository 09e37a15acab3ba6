//! Shared-secret gate for tool execution on `POST /mcp`.
//!
//! Discovery methods are always open. Only `tools/call` needs `x-secret-key`,
//! and only when auth is required and a secret is configured.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::core::mcp::id_of;
use crate::domain::{header_str, SECRET_KEY_HEADER};
use crate::infra::config::Config;
use crate::infra::http::json as http_json;
use crate::infra::http_app::AppState;

pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone, Default)]
pub struct AuthPolicy {
    require_auth: bool,
    secret_key: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPolicy")
            .field("require_auth", &self.require_auth)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    /// Auth is required but there is no secret to compare with. Let it
    /// through and complain.
    AllowUnconfigured,
    Reject(AuthFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingKey,
    InvalidKey,
}

impl AuthFailure {
    pub fn message(self) -> &'static str {
        match self {
            AuthFailure::MissingKey => "Authentication required for tool execution",
            AuthFailure::InvalidKey => "Invalid authentication for tool execution",
        }
    }
}

impl AuthPolicy {
    pub fn new(require_auth: bool, secret_key: Option<&str>) -> Self {
        Self {
            require_auth,
            secret_key: secret_key.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.require_auth, cfg.secret_key.as_deref())
    }

    /// Whether the request body has to be read to reach a decision.
    pub fn inspects_body(&self) -> bool {
        self.require_auth && self.secret_key.is_some()
    }

    pub fn evaluate(&self, method: Option<&str>, provided_key: Option<&str>) -> AuthDecision {
        if !self.require_auth {
            return AuthDecision::Allow;
        }
        let Some(secret) = self.secret_key.as_deref() else {
            return AuthDecision::AllowUnconfigured;
        };
        match method {
            Some("tools/call") => match provided_key {
                None => AuthDecision::Reject(AuthFailure::MissingKey),
                Some(key) if key != secret => AuthDecision::Reject(AuthFailure::InvalidKey),
                Some(_) => AuthDecision::Allow,
            },
            _ => AuthDecision::Allow,
        }
    }
}

/// Middleware for `POST /mcp`. Reads the body to find the method, then hands
/// the same bytes on untouched.
pub async fn require_secret_for_tool_calls(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let policy = &state.auth;
    if !policy.inspects_body() {
        if policy.evaluate(None, None) == AuthDecision::AllowUnconfigured {
            tracing::warn!("REQUIRE_AUTH is enabled but SECRET_KEY is not set; allowing request");
        }
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => return http_json::internal_error(Value::Null, e).into_response(),
    };
    let parsed: Option<Value> = serde_json::from_slice(&bytes).ok();
    let method = parsed
        .as_ref()
        .and_then(|v| v.get("method"))
        .and_then(Value::as_str);
    let provided = header_str(&parts.headers, SECRET_KEY_HEADER);

    if let AuthDecision::Reject(failure) = policy.evaluate(method, provided) {
        let id = parsed.as_ref().map(id_of).unwrap_or(Value::Null);
        tracing::warn!(reason = ?failure, "tool execution rejected");
        return http_json::unauthorized(id, failure.message()).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated() -> AuthPolicy {
        AuthPolicy::new(true, Some("s3cret"))
    }

    #[test]
    fn disabled_auth_allows_everything() {
        let p = AuthPolicy::new(false, Some("s3cret"));
        assert_eq!(p.evaluate(Some("tools/call"), None), AuthDecision::Allow);
        assert!(!p.inspects_body());
    }

    #[test]
    fn missing_secret_fails_open() {
        let p = AuthPolicy::new(true, None);
        assert_eq!(p.evaluate(Some("tools/call"), None), AuthDecision::AllowUnconfigured);
        assert_eq!(AuthPolicy::new(true, Some("")).evaluate(None, None), AuthDecision::AllowUnconfigured);
    }

    #[test]
    fn tool_calls_need_the_exact_key() {
        let p = gated();
        assert_eq!(
            p.evaluate(Some("tools/call"), None),
            AuthDecision::Reject(AuthFailure::MissingKey)
        );
        assert_eq!(
            p.evaluate(Some("tools/call"), Some("S3CRET")),
            AuthDecision::Reject(AuthFailure::InvalidKey)
        );
        assert_eq!(p.evaluate(Some("tools/call"), Some("s3cret")), AuthDecision::Allow);
    }

    #[test]
    fn discovery_and_unknown_methods_pass() {
        let p = gated();
        for m in [Some("initialize"), Some("tools/list"), Some("resources/list"), None] {
            assert_eq!(p.evaluate(m, None), AuthDecision::Allow, "{m:?}");
        }
    }

    #[test]
    fn failure_messages() {
        assert!(AuthFailure::MissingKey.message().contains("Authentication required"));
        assert!(AuthFailure::InvalidKey.message().contains("Invalid authentication"));
    }

    #[test]
    fn debug_hides_secret() {
        assert!(!format!("{:?}", gated()).contains("s3cret"));
    }
}
