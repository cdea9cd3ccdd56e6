//! Neron Control - talk to the NeronExpert avatar from a terminal

use anyhow::Result;
use clap::Parser;
use neronctl::cli::Cli;
use neronctl::{commands, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    commands::run(cli).await
}
