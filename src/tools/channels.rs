use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::clients::slack::SlackClient;
use crate::core::error::GatewayError;
use crate::core::tool::{number_as_u32, parse_args, require_non_empty, Tool, ToolSpec};

#[derive(Clone, Default)]
pub struct ListChannels;

#[derive(Deserialize)]
struct ListChannelsArgs {
    #[serde(default = "default_page_limit", deserialize_with = "number_as_u32")]
    limit: u32,
    #[serde(default)]
    cursor: Option<String>,
}

fn default_page_limit() -> u32 {
    100
}

impl ToolSpec for ListChannels {
    fn name(&self) -> &'static str {
        "slack_list_channels"
    }
    fn description(&self) -> &'static str {
        "List public or pre-defined channels in the workspace with pagination"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "number",
                    "description": "Maximum number of channels to return (default 100, max 200)",
                    "default": 100
                },
                "cursor": {
                    "type": "string",
                    "description": "Pagination cursor for next page of results"
                }
            }
        })
    }
}

#[async_trait]
impl Tool for ListChannels {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let args: ListChannelsArgs = parse_args(arguments)?;
        // A pinned channel list replaces the paginated listing entirely.
        match &client.credentials().channel_ids {
            Some(ids) => client.list_channels_by_ids(ids).await,
            None => client.list_channels(args.limit, args.cursor.as_deref()).await,
        }
    }
}

#[derive(Clone, Default)]
pub struct ChannelHistory;

#[derive(Deserialize)]
struct ChannelHistoryArgs {
    #[serde(default)]
    channel_id: String,
    #[serde(default = "default_history_limit", deserialize_with = "number_as_u32")]
    limit: u32,
}

fn default_history_limit() -> u32 {
    10
}

impl ToolSpec for ChannelHistory {
    fn name(&self) -> &'static str {
        "slack_get_channel_history"
    }
    fn description(&self) -> &'static str {
        "Get recent messages from a channel"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "channel_id": {
                    "type": "string",
                    "description": "The ID of the channel"
                },
                "limit": {
                    "type": "number",
                    "description": "Number of messages to retrieve (default 10)",
                    "default": 10
                }
            },
            "required": ["channel_id"]
        })
    }
}

#[async_trait]
impl Tool for ChannelHistory {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let args: ChannelHistoryArgs = parse_args(arguments)?;
        require_non_empty(&[("channel_id", &args.channel_id)])?;
        client.channel_history(&args.channel_id, args.limit).await
    }
}
