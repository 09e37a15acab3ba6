use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::clients::slack::SlackClient;
use crate::core::error::GatewayError;
use crate::core::tool::{number_as_u32, parse_args, require_non_empty, Tool, ToolSpec};

#[derive(Clone, Default)]
pub struct GetUsers;

#[derive(Deserialize)]
struct GetUsersArgs {
    #[serde(default = "default_limit", deserialize_with = "number_as_u32")]
    limit: u32,
    #[serde(default)]
    cursor: Option<String>,
}

fn default_limit() -> u32 {
    100
}

impl ToolSpec for GetUsers {
    fn name(&self) -> &'static str {
        "slack_get_users"
    }
    fn description(&self) -> &'static str {
        "Get a list of all users in the workspace with their basic profile information"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "cursor": {
                    "type": "string",
                    "description": "Pagination cursor for next page of results"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of users to return (default 100, max 200)",
                    "default": 100
                }
            }
        })
    }
}

#[async_trait]
impl Tool for GetUsers {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let args: GetUsersArgs = parse_args(arguments)?;
        client.users(args.limit, args.cursor.as_deref()).await
    }
}

#[derive(Clone, Default)]
pub struct GetUserProfile;

#[derive(Deserialize)]
struct GetUserProfileArgs {
    #[serde(default)]
    user_id: String,
}

impl ToolSpec for GetUserProfile {
    fn name(&self) -> &'static str {
        "slack_get_user_profile"
    }
    fn description(&self) -> &'static str {
        "Get detailed profile information for a specific user"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The ID of the user"
                }
            },
            "required": ["user_id"]
        })
    }
}

#[async_trait]
impl Tool for GetUserProfile {
    async fn call(
        &self,
        client: &SlackClient,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let args: GetUserProfileArgs = parse_args(arguments)?;
        require_non_empty(&[("user_id", &args.user_id)])?;
        client.user_profile(&args.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlackCredentials;
    use httpmock::prelude::*;

    fn client(base: String) -> SlackClient {
        SlackClient::new(base, SlackCredentials::new("xoxb-test", "T42")).unwrap()
    }

    #[tokio::test]
    async fn get_users_defaults_and_forwards_cursor() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/users.list")
                .query_param("limit", "100")
                .query_param("team_id", "T42")
                .query_param("cursor", "next-page");
            then.status(200).json_body(json!({
                "ok": true,
                "members": [],
                "response_metadata": {"next_cursor": "after"}
            }));
        });
        let out = GetUsers
            .call(&client(server.base_url()), &json!({"cursor": "next-page"}))
            .await
            .unwrap();
        m.assert();
        assert_eq!(out["response_metadata"]["next_cursor"], "after");
    }

    #[tokio::test]
    async fn get_users_clamps_limit() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/users.list").query_param("limit", "200");
            then.status(200).json_body(json!({"ok": true, "members": []}));
        });
        GetUsers.call(&client(server.base_url()), &json!({"limit": 1000})).await.unwrap();
        m.assert();
    }

    #[tokio::test]
    async fn profile_requires_user_id() {
        let err = GetUserProfile
            .call(&client("http://localhost:0".into()), &json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[tokio::test]
    async fn get_users_accepts_float_limit() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/users.list").query_param("limit", "50");
            then.status(200).json_body(json!({"ok": true, "members": []}));
        });
        GetUsers.call(&client(server.base_url()), &json!({"limit": 50.0})).await.unwrap();
        m.assert();
    }
}
