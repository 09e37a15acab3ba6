use crate::core::error::GatewayError;

/// Build a reqwest client for one tool call. No timeouts are set: deadlines
/// are whatever the network stack gives us.
pub fn make_http_client() -> Result<reqwest::Client, GatewayError> {
    Ok(reqwest::Client::builder()
        .user_agent(super::headers::user_agent())
        .build()?)
}

#[cfg(test)]
mod tests {
    #[test]
    fn builds_a_client() {
        assert!(super::make_http_client().is_ok());
    }
}
