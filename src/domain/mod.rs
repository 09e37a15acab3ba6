use axum::http::HeaderMap;

pub const BOT_TOKEN_HEADER: &str = "x-slack-bot-token";
pub const TEAM_ID_HEADER: &str = "x-slack-team-id";
pub const CHANNEL_IDS_HEADER: &str = "x-slack-channel-ids";
pub const SECRET_KEY_HEADER: &str = "x-secret-key";

/// Slack credentials for exactly one request. Built from headers, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct SlackCredentials {
    pub bot_token: String,
    pub team_id: String,
    pub channel_ids: Option<Vec<String>>,
}

// Keep the token out of logs.
impl std::fmt::Debug for SlackCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackCredentials")
            .field("bot_token", &"[REDACTED]")
            .field("team_id", &self.team_id)
            .field("channel_ids", &self.channel_ids)
            .finish()
    }
}

impl SlackCredentials {
    pub fn new(bot_token: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self { bot_token: bot_token.into(), team_id: team_id.into(), channel_ids: None }
    }

    pub fn with_channel_ids(mut self, ids: Option<Vec<String>>) -> Self {
        self.channel_ids = ids;
        self
    }

    /// `None` unless both the bot token and team id headers are present and
    /// non-empty.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let bot_token = header_str(headers, BOT_TOKEN_HEADER)?;
        let team_id = header_str(headers, TEAM_ID_HEADER)?;
        let channel_ids = header_str(headers, CHANNEL_IDS_HEADER).and_then(parse_channel_ids);
        Some(Self::new(bot_token, team_id).with_channel_ids(channel_ids))
    }
}

pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

pub fn parse_channel_ids(raw: &str) -> Option<Vec<String>> {
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect();
    (!ids.is_empty()).then_some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        h
    }

    #[test]
    fn reads_token_team_and_channels() {
        let h = headers(&[
            (BOT_TOKEN_HEADER, "xoxb-1"),
            (TEAM_ID_HEADER, "T1"),
            (CHANNEL_IDS_HEADER, "C1, C2,,"),
        ]);
        let creds = SlackCredentials::from_headers(&h).unwrap();
        assert_eq!(creds.bot_token, "xoxb-1");
        assert_eq!(creds.team_id, "T1");
        assert_eq!(creds.channel_ids, Some(vec!["C1".to_string(), "C2".to_string()]));
    }

    #[test]
    fn missing_or_empty_required_header_yields_none() {
        assert!(SlackCredentials::from_headers(&headers(&[(TEAM_ID_HEADER, "T1")])).is_none());
        assert!(SlackCredentials::from_headers(&headers(&[(BOT_TOKEN_HEADER, "x")])).is_none());
        let empty = headers(&[(BOT_TOKEN_HEADER, ""), (TEAM_ID_HEADER, "T1")]);
        assert!(SlackCredentials::from_headers(&empty).is_none());
    }

    #[test]
    fn blank_channel_list_is_none() {
        let h = headers(&[
            (BOT_TOKEN_HEADER, "x"),
            (TEAM_ID_HEADER, "T1"),
            (CHANNEL_IDS_HEADER, " , "),
        ]);
        assert_eq!(SlackCredentials::from_headers(&h).unwrap().channel_ids, None);
    }

    #[test]
    fn debug_redacts_token() {
        let s = format!("{:?}", SlackCredentials::new("xoxb-secret", "T1"));
        assert!(!s.contains("xoxb-secret"));
        assert!(s.contains("T1"));
    }
}
