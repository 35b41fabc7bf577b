//! Binary crate for the `nimbus` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Human-friendly output formatting
//! - The edit/validation boundary for saved records

use clap::Parser;

mod cli;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nimbus_core::init()?;

    let cmd = cli::Cli::parse();
    cmd.run().await
}
