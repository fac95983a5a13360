//! Browse command implementation.
//!
//! Crawls the open directory, groups what it finds, lets the user pick one
//! entry and prints the resolved variants as JSON.

use crate::cli::args::Cli;
use crate::core::catalog::Catalog;
use crate::core::crawler::Crawler;
use crate::models::config::Config;
use crate::services::http::HttpSource;
use crate::services::picker::FuzzyPicker;
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Apply command line overrides on top of the loaded configuration.
pub fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if cli.strict {
        config.crawl.fail_fast = true;
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout = timeout;
    }
    if let Some(ref user_agent) = cli.user_agent {
        config.http.user_agent = user_agent.clone();
    }
    config
}

/// Execute the browse command.
pub async fn browse(cli: &Cli, config: &Config) -> Result<()> {
    let source = HttpSource::new(&config.http)?;
    let crawler = Crawler::new(source, &cli.url, None)?.with_config(&config.crawl);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!("Crawling {}", cli.url));

    let result = Catalog::build(crawler, !cli.hush_path, |label, stats| {
        spinner.set_message(format!(
            "{} dirs, {} files | {}",
            stats.directories, stats.files, label
        ));
    })
    .await;
    spinner.finish_and_clear();
    let catalog = result?;

    print_summary(&catalog);

    if catalog.entries().is_empty() {
        eprintln!("{}", "No files found.".yellow());
        return Ok(());
    }

    if cli.list {
        for label in catalog.labels() {
            println!("{}", label);
        }
        return Ok(());
    }

    let mut picker = FuzzyPicker::new(&config.picker);
    let resolved = catalog.pick(&mut picker)?;

    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn print_summary(catalog: &Catalog) {
    let stats = catalog.stats();

    eprintln!(
        "{} {} entries from {} files in {} directories",
        "Found".bold().green(),
        catalog.entries().len(),
        stats.files,
        stats.directories
    );

    if !stats.failed.is_empty() {
        eprintln!(
            "{} {} directories could not be listed:",
            "Warning:".bold().yellow(),
            stats.failed.len()
        );
        for url in &stats.failed {
            eprintln!("  {} {}", "->".yellow(), url);
        }
    }
}
