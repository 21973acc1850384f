//! Sumi-Sweep main entry point
//!
//! This is the command-line interface for the Sumi-Sweep content sweeper.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sumi_sweep::config::{load_config_with_hash, validate, Config};
use sumi_sweep::crawler::{crawl, CrawlOutcome};
use sumi_sweep::output::{print_summary, write_text_export, CrawlSummary};
use sumi_sweep::progress::{JsonLinesSink, LogSink};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Sumi-Sweep: a bounded breadth-first content sweeper
///
/// Sumi-Sweep crawls a site outward from one seed URL, up to a link depth and
/// a page budget, and collects the readable content and links of every page.
#[derive(Parser, Debug)]
#[command(name = "sumi-sweep")]
#[command(version)]
#[command(about = "A bounded breadth-first content sweeper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the job without crawling
    #[arg(long, conflicts_with_all = ["events", "export"])]
    dry_run: bool,

    /// Stream progress events to stdout as JSON lines
    #[arg(long)]
    events: bool,

    /// Write a plain-text export of the crawled pages to this path
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let export_path = cli
        .export
        .clone()
        .or_else(|| config.output.export_path.as_ref().map(PathBuf::from));

    handle_crawl(&config, cli.events, export_path.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays free for the event stream.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sweep=info,warn"),
            1 => EnvFilter::new("sumi_sweep=debug,info"),
            2 => EnvFilter::new("sumi_sweep=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the job
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let job = validate(config).context("Configuration is invalid")?;

    println!("=== Sumi-Sweep Dry Run ===\n");

    println!("Job:");
    println!("  Seed: {}", job.seed);
    println!("  Max depth: {}", job.max_depth);
    println!("  Max pages: {}", job.max_pages);
    println!("  Concurrency: {}", job.concurrency);
    println!("  Timeout: {}ms", job.timeout.as_millis());
    println!("  Link selector: {}", job.link_selector);
    println!("  Content selector: {}", job.content_selector);
    println!("  Same domain only: {}", config.job.same_domain);
    if let Some(pattern) = &config.job.url_regex {
        println!("  Include pattern: {}", pattern);
    }
    if let Some(pattern) = &config.job.exclude_regex {
        println!("  Exclude pattern: {}", pattern);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    if let Some(path) = &config.output.export_path {
        println!("\nOutput:");
        println!("  Export: {}", path);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} pages starting at {}",
        job.max_pages, job.seed
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    events: bool,
    export_path: Option<&Path>,
) -> anyhow::Result<()> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current batch");
            let _ = cancel_tx.send(true);
        }
    });

    let start_time = Instant::now();
    let outcome = if events {
        crawl(config, JsonLinesSink::stdout(), Some(cancel_rx)).await
    } else {
        crawl(config, LogSink, Some(cancel_rx)).await
    };

    report(&outcome, start_time, events);

    if let Some(path) = export_path {
        if outcome.results.is_empty() {
            tracing::warn!("No pages crawled, skipping export to {}", path.display());
        } else {
            write_text_export(&outcome.results, &config.job, path)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
        }
    }

    match outcome.error {
        Some(e) => Err(anyhow::Error::new(e).context("Crawl aborted")),
        None => Ok(()),
    }
}

/// Prints the crawl summary, or logs it when stdout carries events
fn report(outcome: &CrawlOutcome, start_time: Instant, events: bool) {
    let summary =
        CrawlSummary::from_results(outcome.state, &outcome.results, start_time.elapsed());

    if events {
        tracing::info!(
            "Crawl {}: {} pages ({} failed), {} links",
            summary.state,
            summary.pages,
            summary.failed_pages,
            summary.links_discovered
        );
    } else {
        print_summary(&summary);
    }
}
