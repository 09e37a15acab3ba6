use reqwest::Client;
use serde_json::{json, Value};
use std::time::Instant;

use crate::core::error::GatewayError;
use crate::domain::SlackCredentials;
use crate::infra::http::client::make_http_client;
use crate::infra::http::headers::add_standard_headers;

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Slack Web API client scoped to one tool call. Every method issues one
/// request and returns the upstream JSON body untouched; Slack's own `ok`
/// and `error` fields are left for the caller to read.
#[derive(Clone, Debug)]
pub struct SlackClient {
    base: String,
    http: Client,
    credentials: SlackCredentials,
}

impl SlackClient {
    pub fn new(
        base: impl Into<String>,
        credentials: SlackCredentials,
    ) -> Result<Self, GatewayError> {
        Ok(Self { base: base.into(), http: make_http_client()?, credentials })
    }

    pub fn credentials(&self) -> &SlackCredentials {
        &self.credentials
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), method)
    }

    async fn get(&self, method: &'static str, query: &[(&str, String)]) -> Result<Value, GatewayError> {
        let url = self.url(method);
        tracing::debug!(endpoint = %url, "slack GET");
        let (builder, _rid) =
            add_standard_headers(self.http.get(url).query(query), &self.credentials.bot_token, None);
        self.send(method, builder).await
    }

    async fn post(&self, method: &'static str, body: &Value) -> Result<Value, GatewayError> {
        let url = self.url(method);
        tracing::debug!(endpoint = %url, "slack POST");
        let (builder, _rid) =
            add_standard_headers(self.http.post(url).json(body), &self.credentials.bot_token, None);
        self.send(method, builder).await
    }

    async fn send(
        &self,
        method: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> Result<Value, GatewayError> {
        let start = Instant::now();
        let res = async { Ok::<_, reqwest::Error>(builder.send().await?.json::<Value>().await?) }.await;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::record_upstream(method, elapsed_ms, res.is_ok());
        if let Err(e) = &res {
            tracing::warn!(method, error = %e, "slack request failed");
        }
        Ok(res?)
    }

    pub async fn list_channels(&self, limit: u32, cursor: Option<&str>) -> Result<Value, GatewayError> {
        let mut query = vec![
            ("types", "public_channel".to_string()),
            ("exclude_archived", "true".to_string()),
            ("limit", limit.min(MAX_PAGE_LIMIT).to_string()),
            ("team_id", self.credentials.team_id.clone()),
        ];
        if let Some(c) = cursor {
            query.push(("cursor", c.to_string()));
        }
        self.get("conversations.list", &query).await
    }

    pub async fn channel_info(&self, channel_id: &str) -> Result<Value, GatewayError> {
        self.get("conversations.info", &[("channel", channel_id.to_string())])
            .await
    }

    /// Look up each id in order and build a `conversations.list`-shaped page
    /// from the ones that exist and are not archived.
    pub async fn list_channels_by_ids(&self, ids: &[String]) -> Result<Value, GatewayError> {
        let mut channels = Vec::with_capacity(ids.len());
        for id in ids {
            let info = self.channel_info(id).await?;
            if info.get("ok").and_then(Value::as_bool) != Some(true) {
                continue;
            }
            let Some(channel) = info.get("channel").filter(|c| c.is_object()) else {
                continue;
            };
            if channel.get("is_archived").and_then(Value::as_bool) == Some(true) {
                continue;
            }
            channels.push(channel.clone());
        }
        Ok(json!({
            "ok": true,
            "channels": channels,
            "response_metadata": { "next_cursor": "" }
        }))
    }

    pub async fn post_message(&self, channel_id: &str, text: &str) -> Result<Value, GatewayError> {
        self.post("chat.postMessage", &json!({ "channel": channel_id, "text": text }))
            .await
    }

    pub async fn reply_to_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<Value, GatewayError> {
        self.post(
            "chat.postMessage",
            &json!({ "channel": channel_id, "thread_ts": thread_ts, "text": text }),
        )
        .await
    }

    pub async fn add_reaction(
        &self,
        channel_id: &str,
        timestamp: &str,
        reaction: &str,
    ) -> Result<Value, GatewayError> {
        self.post(
            "reactions.add",
            &json!({ "channel": channel_id, "timestamp": timestamp, "name": reaction }),
        )
        .await
    }

    pub async fn channel_history(&self, channel_id: &str, limit: u32) -> Result<Value, GatewayError> {
        self.get(
            "conversations.history",
            &[("channel", channel_id.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn thread_replies(&self, channel_id: &str, thread_ts: &str) -> Result<Value, GatewayError> {
        self.get(
            "conversations.replies",
            &[("channel", channel_id.to_string()), ("ts", thread_ts.to_string())],
        )
        .await
    }

    pub async fn users(&self, limit: u32, cursor: Option<&str>) -> Result<Value, GatewayError> {
        let mut query = vec![
            ("limit", limit.min(MAX_PAGE_LIMIT).to_string()),
            ("team_id", self.credentials.team_id.clone()),
        ];
        if let Some(c) = cursor {
            query.push(("cursor", c.to_string()));
        }
        self.get("users.list", &query).await
    }

    pub async fn user_profile(&self, user_id: &str) -> Result<Value, GatewayError> {
        self.get(
            "users.profile.get",
            &[("user", user_id.to_string()), ("include_labels", "true".to_string())],
        )
        .await
    }
}
