//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap site crawler.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sumi_sitemap::config::{load_config_with_hash, Config};
use sumi_sitemap::output::{print_statistics, write_sitemap};
use sumi_sitemap::{ConfigError, Coordinator, SitemapError, UrlSet};
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a same-domain sitemap builder
///
/// Sumi-Sitemap crawls a website breadth-first from a root URL, follows
/// links that stay on the root's host, and prints the discovered pages as a
/// Sitemaps XML document.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version)]
#[command(about = "A same-domain sitemap builder", long_about = None)]
struct Cli {
    /// Root URL to start crawling from (overrides the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of rounds to crawl from the root
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Number of concurrent page fetches
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write the sitemap to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print crawl statistics to stderr after the crawl
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    handle_crawl(&cli, &config).await?;
    Ok(())
}

/// Loads the config file named by `--config`, or defaults when none is given
fn load_settings(cli: &Cli) -> Result<Config, SitemapError> {
    let Some(path) = &cli.config else {
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the sitemap.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Picks the root URL: command line first, then the config file
fn root_url(cli: &Cli, config: &Config) -> Result<String, SitemapError> {
    cli.url
        .clone()
        .or_else(|| config.crawler.root_url.clone())
        .ok_or_else(|| {
            ConfigError::Validation(
                "no root URL given; pass URL or set crawler.root-url in the config".to_string(),
            )
            .into()
        })
}

/// Writes the sitemap to `output`, or to stdout when unset
fn emit_sitemap(urls: &UrlSet, output: Option<&Path>) -> Result<(), SitemapError> {
    match output {
        Some(path) => {
            write_sitemap(urls, path)?;
            tracing::info!("Sitemap with {} URLs written to {}", urls.len(), path.display());
        }
        None => print!("{}", urls.to_xml()?),
    }

    Ok(())
}

/// Handles the main crawl operation
///
/// Command-line values win over the config file, which wins over defaults.
async fn handle_crawl(cli: &Cli, config: &Config) -> Result<(), SitemapError> {
    let root = root_url(cli, config)?;

    let mut options = config.to_options();
    if let Some(depth) = cli.depth {
        options = options.with_max_depth(depth);
    }
    if let Some(concurrency) = cli.concurrency {
        options = options.with_concurrency(concurrency);
    }
    if let Some(secs) = cli.timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let coordinator = Coordinator::new(&root, options)?;
    let (urls, stats) = match coordinator.run_with_stats().await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e);
        }
    };

    let output = cli
        .output
        .clone()
        .or_else(|| config.output.sitemap_path.as_ref().map(PathBuf::from));
    emit_sitemap(&urls, output.as_deref())?;

    if cli.stats {
        print_statistics(&stats);
    }

    Ok(())
}
