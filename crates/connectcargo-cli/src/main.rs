//! ConnectCargo - freight load board
//!
//! A CLI over the board engine: carriers browse and accept loads, companies
//! publish loads, find drivers and rate completed trips.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
