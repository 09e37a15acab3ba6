use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::slack::SlackClient;
use crate::core::error::GatewayError;
use crate::core::tool::{Tool, ToolMeta};

use super::channels::{ChannelHistory, ListChannels};
use super::messages::{AddReaction, PostMessage, ReplyToThread, ThreadReplies};
use super::users::{GetUserProfile, GetUsers};

/// Immutable name → tool table. Listing order is registration order.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<[Arc<dyn Tool>]>,
    by_name: Arc<HashMap<&'static str, usize>>,
}

impl ToolRegistry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let tools: Vec<Arc<dyn Tool>> = iter.into_iter().collect();
        let by_name = tools.iter().enumerate().map(|(i, t)| (t.name(), i)).collect();
        Self { tools: tools.into(), by_name: Arc::new(by_name) }
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.tools.iter().map(|t| ToolMeta::of(t.as_ref())).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub async fn call(
        &self,
        name: &str,
        client: &SlackClient,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let t = self
            .get(name)
            .ok_or_else(|| GatewayError::UnknownTool(name.to_string()))?;
        t.call(client, args).await
    }
}

/// The eight Slack tools, in the order `tools/list` reports them.
pub fn build_registry() -> ToolRegistry {
    ToolRegistry::with_tools([
        Arc::new(ListChannels) as Arc<dyn Tool>,
        Arc::new(PostMessage),
        Arc::new(ReplyToThread),
        Arc::new(AddReaction),
        Arc::new(ChannelHistory),
        Arc::new(ThreadReplies),
        Arc::new(GetUsers),
        Arc::new(GetUserProfile),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tool::ToolSpec;
    use crate::domain::SlackCredentials;
    use async_trait::async_trait;

    struct Echo;

    impl ToolSpec for Echo {
        fn name(&self) -> &'static str { "test.echo2" }
        fn description(&self) -> &'static str { "echo tool" }
        fn input_schema(&self) -> serde_json::Value { serde_json::json!({"type":"object"}) }
    }

    #[async_trait]
    impl Tool for Echo {
        async fn call(
            &self,
            _client: &SlackClient,
            args: &serde_json::Value,
        ) -> Result<serde_json::Value, GatewayError> {
            Ok(args.clone())
        }
    }

    fn client() -> SlackClient {
        SlackClient::new("http://localhost:0", SlackCredentials::new("x", "T")).unwrap()
    }

    #[tokio::test]
    async fn registry_registers_lists_and_calls() {
        let reg = ToolRegistry::with_tools([Arc::new(Echo) as Arc<dyn Tool>]);
        let metas = reg.list();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].name, "test.echo2");
        let out = reg.call("test.echo2", &client(), &serde_json::json!({"x": 2})).await.unwrap();
        assert_eq!(out["x"], 2);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = build_registry()
            .call("slack_nonexistent", &client(), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: slack_nonexistent");
    }

    #[test]
    fn lists_all_eight_tools_in_fixed_order() {
        let names: Vec<&str> = build_registry().list().iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "slack_list_channels",
                "slack_post_message",
                "slack_reply_to_thread",
                "slack_add_reaction",
                "slack_get_channel_history",
                "slack_get_thread_replies",
                "slack_get_users",
                "slack_get_user_profile",
            ]
        );
    }

    #[test]
    fn every_schema_is_an_object() {
        for meta in build_registry().list() {
            assert_eq!(meta.input_schema["type"], "object", "{}", meta.name);
        }
    }
}
