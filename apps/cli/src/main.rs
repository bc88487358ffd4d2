//! sitekb CLI — build a business knowledge base from a website.
//!
//! Crawls a site (sitemap + link-following), extracts contact data,
//! opening hours, services, and readable text, and exports the result as
//! JSON and plain text.

mod commands;

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
