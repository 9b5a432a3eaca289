//! CarePortal - Main Entry Point

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;

use careportal::{Cli, logging, run};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    run(cli, &mut input, &mut output).await
}
