use serde::Deserialize;
use thiserror::Error;

use crate::clients::slack::DEFAULT_SLACK_API_BASE;

pub const CONFIG_FILE_ENV: &str = "MCP_CONFIG";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub secret_key: Option<String>,
    pub require_auth: bool,
    pub slack_api_base: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got {0:?}")]
    InvalidPort(String),
    #[error("HOST must not be empty")]
    InvalidHost,
    #[error("could not read config file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".into(),
            secret_key: None,
            require_auth: true,
            slack_api_base: DEFAULT_SLACK_API_BASE.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    port: Option<u16>,
    host: Option<String>,
    secret_key: Option<String>,
    require_auth: Option<bool>,
    slack_api_base: Option<String>,
}

impl Config {
    /// Defaults, then the TOML file named by `MCP_CONFIG` (if any), then env.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::File { path: path.clone(), source })?;
                Self::from_toml_str(&raw)?
            }
            _ => Self::default(),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(raw)?;
        let mut cfg = Self::default();
        let s = file.server;
        if let Some(port) = s.port {
            cfg.port = port;
        }
        if let Some(host) = s.host {
            cfg.host = host;
        }
        if let Some(secret) = s.secret_key {
            cfg.secret_key = non_empty(secret);
        }
        if let Some(require_auth) = s.require_auth {
            cfg.require_auth = require_auth;
        }
        if let Some(base) = s.slack_api_base {
            cfg.slack_api_base = base;
        }
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(secret) = std::env::var("SECRET_KEY") {
            self.secret_key = non_empty(secret);
        }
        if let Ok(v) = std::env::var("REQUIRE_AUTH") {
            self.require_auth = !v.trim().eq_ignore_ascii_case("false");
        }
        if let Ok(base) = std::env::var("SLACK_API_BASE_URL") {
            if !base.trim().is_empty() {
                self.slack_api_base = base;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidHost);
        }
        Ok(())
    }

    /// Auth is nominally on but nothing can be checked against.
    pub fn auth_fails_open(&self) -> bool {
        self.require_auth && self.secret_key.is_none()
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
