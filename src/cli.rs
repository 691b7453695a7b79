use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "worklog-cli")]
#[command(about = "Interactive terminal client for the shared work report sheet")]
pub struct Cli {
    /// Report endpoint URL (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Shared form token sent with every submission (overrides the config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Path to an alternate config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
