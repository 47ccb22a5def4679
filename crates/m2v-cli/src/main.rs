//! m2v - Maven to vendor CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use m2v_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v turns on debug output for the m2v crates.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("warn,m2v_core=debug,m2v_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    m2v_cli::run::run(&cli).await
}
