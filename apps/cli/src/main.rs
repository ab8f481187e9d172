//! rollup CLI: closes parent issues once every sub-issue is complete.
//!
//! Walks a GitHub issue's sub-issue tree depth-first and closes each parent
//! whose children are all done, innermost first.

mod commands;
mod display;

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
