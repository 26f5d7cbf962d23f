//! LogoCrawler CLI: find and rank logos for a list of organizations.
//!
//! Reads organization names or domains from a file, discovers candidate
//! logo images for each, validates them, and writes an HTML report.

mod browser;
mod commands;
mod progress;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
