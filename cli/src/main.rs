// CLI-specific lint overrides
#![allow(clippy::print_stdout, reason = "CLI tools print to stdout")]
#![allow(clippy::print_stderr, reason = "CLI tools print to stderr")]
#![allow(clippy::unwrap_used, reason = "CLI can unwrap for user-facing errors")]
#![allow(clippy::expect_used, reason = "CLI can expect for user-facing errors")]

mod cli;
mod commands;
mod config;
mod output;
mod wallet;

use clap::Parser;
use cli::{Cli, Commands};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "safe_clone={default_level},safe_clone_cli={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Locate(args) => commands::locate::run(args, cli.json).await,
        Commands::Status(args) => commands::status::run(args, cli.json).await,
        Commands::Deploy(args) => commands::deploy::run(args, cli.json).await,
        Commands::Predict(args) => commands::predict::run(args, cli.json).await,
        Commands::Allowances(args) => commands::allowances::run(args, cli.json).await,
    }
}
