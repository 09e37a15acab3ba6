use clap::Parser;
use std::process::ExitCode;

use mcp_slack_server::cli::{run_commands, Cli, Commands};
use mcp_slack_server::infra::logging;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();
    run_commands(cli.command.unwrap_or(Commands::Serve)).await
}
