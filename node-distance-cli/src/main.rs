//! node-distance - node and token distances over dependency parses
//!
//! Reads CoNLL-U or JSON Lines, computes bounded all-pairs tree distances
//! with `node_distance_fast`, and reports them or their distributions.

mod cli;
mod config;
mod input;
mod reporters;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging; stdout is reserved for reports
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
