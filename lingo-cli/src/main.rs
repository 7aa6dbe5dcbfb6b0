mod bot;
mod cli;
mod console;
mod serve;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use lingo_console::ConsoleConfig;
use lingo_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Console => console::run_console(ConsoleConfig::from_env()).await,
        Commands::Bot { transport, flow } => bot::run_bot(config, transport, flow).await,
        Commands::Serve { port } => serve::run_serve(port, &config).await,
    }
}
