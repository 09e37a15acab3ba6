use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{discovery, mcp};
use crate::infra::auth::{self, AuthPolicy};
use crate::infra::config::Config;
use crate::infra::logging;
use crate::tools::registry::{build_registry, ToolRegistry};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: ToolRegistry,
    pub auth: AuthPolicy,
}

impl AppState {
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        let auth = AuthPolicy::from_config(&config);
        Self { config: Arc::new(config), registry, auth }
    }

    pub fn from_config(config: Config) -> Self {
        Self::new(config, build_registry())
    }
}

/// `GET /`, `/health`, `/tools` are open; `POST /mcp` sits behind the
/// tool-execution gate. Every route gets a request summary log line.
pub fn build_app(state: AppState) -> Router {
    let rpc = Router::new()
        .route("/mcp", post(mcp::http))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_secret_for_tool_calls,
        ));

    Router::new()
        .route("/", get(discovery::root))
        .route("/health", get(discovery::health))
        .route("/tools", get(discovery::tools))
        .merge(rpc)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(require_auth: bool, secret: Option<&str>) -> Router {
        let cfg = Config {
            require_auth,
            secret_key: secret.map(str::to_string),
            ..Config::default()
        };
        build_app(AppState::from_config(cfg))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn rpc(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_open_even_with_auth() {
        let resp = app(true, Some("s"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "healthy");
    }

    #[tokio::test]
    async fn tools_list_is_open_with_auth() {
        let resp = app(true, Some("s"))
            .oneshot(rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["result"]["tools"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn tools_call_without_key_is_401() {
        let resp = app(true, Some("s"))
            .oneshot(rpc(json!({
                "jsonrpc": "2.0", "id": 9, "method": "tools/call",
                "params": {"name": "slack_get_users", "arguments": {}}
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let v = body_json(resp).await;
        assert_eq!(v["id"], 9);
        assert_eq!(v["error"]["code"], -32001);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let resp = app(false, None)
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
