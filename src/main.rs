//! Open Directory Catalog CLI
//!
//! Browses an open directory index, groups resolution variants of the same
//! episode and prints the picked entry with its subtitles.

use clap::Parser;
use colored::Colorize;
use od_catalog::cli::{args::Cli, commands::browse};
use od_catalog::models::config;
use od_catalog::Error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = browse::apply_overrides(config::load_config(), &cli);

    match browse::browse(&cli, &config).await {
        Ok(()) => Ok(()),
        Err(Error::SelectionCancelled) => {
            eprintln!("{}", "Selection cancelled.".yellow());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("od_catalog=debug")
    } else {
        EnvFilter::new("od_catalog=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}
