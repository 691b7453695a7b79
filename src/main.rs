use anyhow::Result;
use clap::Parser;
use log::info;

use worklog_cli::api::ReportClient;
use worklog_cli::cli::Cli;
use worklog_cli::config::{Config, DEFAULT_ENDPOINT, DEFAULT_TOKEN};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run); the TUI owns stdout
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("worklog-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting worklog-cli");

    let config = Config::load(cli.config.as_deref())?;
    let endpoint = cli
        .endpoint
        .or(config.endpoint)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let token = cli
        .token
        .or(config.token)
        .unwrap_or_else(|| DEFAULT_TOKEN.to_string());
    info!("Report endpoint: {}", endpoint);

    let client = ReportClient::new(endpoint, token);
    worklog_cli::tui::run(client).await
}
