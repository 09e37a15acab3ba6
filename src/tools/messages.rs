use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::clients::slack::SlackClient;
use crate::core::error::GatewayError;
use crate::core::tool::{parse_args, require_non_empty, Tool, ToolSpec};

const THREAD_TS_DESCRIPTION: &str = "The timestamp of the parent message in the format \
'1234567890.123456'. Timestamps in the format without the period can be converted by adding \
the period such that 6 numbers come after it.";

#[derive(Deserialize)]
struct MessageArgs {
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    thread_ts: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    reaction: String,
    #[serde(default)]
    text: String,
}

#[derive(Clone, Default)]
pub struct PostMessage;

impl ToolSpec for PostMessage {
    fn name(&self) -> &'static str {
        "slack_post_message"
    }
    fn description(&self) -> &'static str {
        "Post a new message to a Slack channel"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "channel_id": {
                    "type": "string",
                    "description": "The ID of the channel to post to"
                },
                "text": {
                    "type": "string",
                    "description": "The message text to post"
                }
            },
            "required": ["channel_id", "text"]
        })
    }
}

#[async_trait]
impl Tool for PostMessage {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let a: MessageArgs = parse_args(arguments)?;
        require_non_empty(&[("channel_id", &a.channel_id), ("text", &a.text)])?;
        client.post_message(&a.channel_id, &a.text).await
    }
}

#[derive(Clone, Default)]
pub struct ReplyToThread;

impl ToolSpec for ReplyToThread {
    fn name(&self) -> &'static str {
        "slack_reply_to_thread"
    }
    fn description(&self) -> &'static str {
        "Reply to a specific message thread in Slack"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "channel_id": {
                    "type": "string",
                    "description": "The ID of the channel containing the thread"
                },
                "thread_ts": {
                    "type": "string",
                    "description": THREAD_TS_DESCRIPTION
                },
                "text": {
                    "type": "string",
                    "description": "The reply text"
                }
            },
            "required": ["channel_id", "thread_ts", "text"]
        })
    }
}

#[async_trait]
impl Tool for ReplyToThread {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let a: MessageArgs = parse_args(arguments)?;
        require_non_empty(&[
            ("channel_id", &a.channel_id),
            ("thread_ts", &a.thread_ts),
            ("text", &a.text),
        ])?;
        client.reply_to_thread(&a.channel_id, &a.thread_ts, &a.text).await
    }
}

#[derive(Clone, Default)]
pub struct AddReaction;

impl ToolSpec for AddReaction {
    fn name(&self) -> &'static str {
        "slack_add_reaction"
    }
    fn description(&self) -> &'static str {
        "Add a reaction emoji to a message"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "channel_id": {
                    "type": "string",
                    "description": "The ID of the channel containing the message"
                },
                "timestamp": {
                    "type": "string",
                    "description": "The timestamp of the message to react to"
                },
                "reaction": {
                    "type": "string",
                    "description": "The name of the emoji reaction (without ::)"
                }
            },
            "required": ["channel_id", "timestamp", "reaction"]
        })
    }
}

#[async_trait]
impl Tool for AddReaction {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let a: MessageArgs = parse_args(arguments)?;
        require_non_empty(&[
            ("channel_id", &a.channel_id),
            ("timestamp", &a.timestamp),
            ("reaction", &a.reaction),
        ])?;
        client.add_reaction(&a.channel_id, &a.timestamp, &a.reaction).await
    }
}

#[derive(Clone, Default)]
pub struct ThreadReplies;

impl ToolSpec for ThreadReplies {
    fn name(&self) -> &'static str {
        "slack_get_thread_replies"
    }
    fn description(&self) -> &'static str {
        "Get all replies in a message thread"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "channel_id": {
                    "type": "string",
                    "description": "The ID of the channel containing the thread"
                },
                "thread_ts": {
                    "type": "string",
                    "description": THREAD_TS_DESCRIPTION
                }
            },
            "required": ["channel_id", "thread_ts"]
        })
    }
}

#[async_trait]
impl Tool for ThreadReplies {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let a: MessageArgs = parse_args(arguments)?;
        require_non_empty(&[("channel_id", &a.channel_id), ("thread_ts", &a.thread_ts)])?;
        client.thread_replies(&a.channel_id, &a.thread_ts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlackCredentials;
    use httpmock::prelude::*;

    fn client(base: String) -> SlackClient {
        SlackClient::new(base, SlackCredentials::new("xoxb-test", "T1")).unwrap()
    }

    #[tokio::test]
    async fn post_message_calls_chat_post_message() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/chat.postMessage")
                .json_body(json!({"channel": "C1", "text": "Dia dhuit"}));
            then.status(200).json_body(json!({"ok": true, "ts": "1.1"}));
        });
        let out = PostMessage
            .call(&client(server.base_url()), &json!({"channel_id": "C1", "text": "Dia dhuit"}))
            .await
            .unwrap();
        m.assert();
        assert_eq!(out["ts"], "1.1");
    }

    #[tokio::test]
    async fn post_message_without_text_never_reaches_slack() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(200).json_body(json!({"ok": true}));
        });
        let err = PostMessage
            .call(&client(server.base_url()), &json!({"channel_id": "C1"}))
            .await
            .unwrap_err();
        assert_eq!(m.hits(), 0);
        assert!(err.to_string().contains("text"));
    }

    #[tokio::test]
    async fn reply_and_reaction_validate_their_fields() {
        let cli = client("http://localhost:0".into());
        let err = ReplyToThread
            .call(&cli, &json!({"channel_id": "C1", "text": "x"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("thread_ts"));

        let err = AddReaction
            .call(&cli, &json!({"channel_id": "C1", "timestamp": "1.1"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reaction"));
    }

    #[tokio::test]
    async fn thread_replies_queries_by_ts() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.replies")
                .query_param("channel", "C1")
                .query_param("ts", "1700000000.000200");
            then.status(200).json_body(json!({"ok": true, "messages": [{"text": "a"}]}));
        });
        let out = ThreadReplies
            .call(
                &client(server.base_url()),
                &json!({"channel_id": "C1", "thread_ts": "1700000000.000200"}),
            )
            .await
            .unwrap();
        m.assert();
        assert_eq!(out["messages"][0]["text"], "a");
    }
}
