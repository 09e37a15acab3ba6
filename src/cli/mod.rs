use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "mcp-slack-server")]
#[command(about = "MCP Slack Server - remote Slack tools over JSON-RPC, plus admin commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Health check a running service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Print the effective configuration
    Config {
        /// Only validate; do not print the configuration
        #[arg(long)]
        validate: bool,
    },
    /// Show service status and local configuration
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// List the tools a running service exposes
    Tools {
        /// Service URL to query
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match crate::infra::boot::run_server().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Server failed: {e:#}");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate } => match validate_config() {
            Ok(cfg) => {
                if !validate {
                    println!("📋 Configuration:");
                    for line in config_lines(&cfg) {
                        println!("  {line}");
                    }
                }
                println!("✅ Configuration is valid");
                if cfg.auth_fails_open() {
                    println!("⚠️  REQUIRE_AUTH is on but SECRET_KEY is unset: tool calls are unprotected");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Tools { url } => match list_tools(&url).await {
            Ok(tools) => {
                for (name, description) in tools {
                    println!("  • {name}: {description}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Tool listing failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let response = reqwest::Client::new()
        .get(format!("{}/health", url.trim_end_matches('/')))
        .timeout(Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<Config, Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    if cfg.port == 0 {
        return Err("PORT cannot be 0".into());
    }
    reqwest::Url::parse(&cfg.slack_api_base)
        .map_err(|e| format!("SLACK_API_BASE_URL is not a valid URL: {e}"))?;
    Ok(cfg)
}

fn config_lines(cfg: &Config) -> Vec<String> {
    vec![
        format!("Bind: {}:{}", cfg.host, cfg.port),
        format!("Require Auth: {}", cfg.require_auth),
        format!("Secret Key: {}", mask(cfg.secret_key.as_deref())),
        format!("Slack API: {}", cfg.slack_api_base),
    ]
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        None => "Not configured".into(),
        Some(s) if s.chars().count() <= 4 => "****".into(),
        Some(s) => {
            let tail: String = s.chars().skip(s.chars().count() - 4).collect();
            format!("****{tail}")
        }
    }
}

async fn list_tools(url: &str) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    let body: serde_json::Value = reqwest::Client::new()
        .get(format!("{}/tools", url.trim_end_matches('/')))
        .timeout(Duration::from_secs(2))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let tools = body["tools"]
        .as_array()
        .ok_or("response has no tools array")?
        .iter()
        .filter_map(|t| {
            let name = t["name"].as_str()?.to_string();
            let description = t["description"].as_str().unwrap_or_default().to_string();
            Some((name, description))
        })
        .collect();
    Ok(tools)
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("🕒 {}", chrono::Utc::now().to_rfc3339());

    let health_response = reqwest::Client::new()
        .get(format!("{}/health", url.trim_end_matches('/')))
        .timeout(Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "🏥 Health Status: {}",
        if health_response.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    match list_tools(url).await {
        Ok(tools) => println!("🔧 Tools: ✅ {} available", tools.len()),
        Err(e) => println!("🔧 Tools: ❌ {e}"),
    }

    println!("\n📋 Configuration:");
    match Config::from_env() {
        Ok(cfg) => {
            for line in config_lines(&cfg) {
                println!("  {line}");
            }
        }
        Err(e) => println!("  ❌ {e}"),
    }
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );

    Ok(())
}
