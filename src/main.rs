//! Sumi-Scout main entry point
//!
//! This is the command-line interface for the Sumi-Scout sitemap discoverer.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sumi_scout::config::{load_config_with_hash, Config};
use sumi_scout::input::{read_site_list, SiteList};
use sumi_scout::output::FileSink;
use sumi_scout::run_batch;
use tracing_subscriber::EnvFilter;

/// Sumi-Scout: sitemap discovery for batches of websites
///
/// Sumi-Scout probes each listed site, locates its sitemap (well-known
/// paths, then robots.txt), expands sitemap indexes into page lists, and
/// can hand sitemaps to a remote processing API.
#[derive(Parser, Debug)]
#[command(name = "sumi-scout")]
#[command(version = "1.0.0")]
#[command(about = "Sitemap discovery for batches of websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Site list CSV (overrides input.sites-path)
    #[arg(short, long, value_name = "CSV")]
    input: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not submit sitemaps to the processing API, even if enabled in config
    #[arg(long)]
    no_jobs: bool,

    /// Validate config and the site list, then exit without network access
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.no_jobs {
        config.jobs.enabled = false;
    }

    let sites_path = cli
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.input.sites_path));
    let sites = read_site_list(&sites_path)
        .with_context(|| format!("failed to read site list {}", sites_path.display()))?;
    tracing::info!(
        "Loaded {} sites from {} ({} invalid rows skipped)",
        sites.sites.len(),
        sites_path.display(),
        sites.skipped
    );

    if cli.dry_run {
        handle_dry_run(&config, &sites);
        return Ok(());
    }

    handle_batch(config, sites).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scout=info,warn"),
            1 => EnvFilter::new("sumi_scout=debug,info"),
            2 => EnvFilter::new("sumi_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be processed
fn handle_dry_run(config: &Config, sites: &SiteList) {
    println!("=== Sumi-Scout Dry Run ===\n");

    println!("Discovery:");
    println!("  Sitemap paths: {}", config.discovery.sitemap_paths.join(", "));
    println!("  Redirect hop budget: {}", config.discovery.hop_budget);
    println!("  Max index depth: {}", config.discovery.max_depth);

    println!("\nHTTP:");
    println!("  Probe timeout: {}s", config.http.probe_timeout_secs);
    println!("  Fetch timeout: {}s", config.http.fetch_timeout_secs);
    println!("  Max in-flight requests: {}", config.http.max_in_flight_requests);
    println!(
        "  Lenient TLS for robots.txt: {}",
        config.http.robots_accept_invalid_certs
    );

    println!("\nJobs:");
    if config.jobs.enabled {
        println!("  API: {}", config.jobs.api_base_url);
        println!(
            "  Polling: {} attempts, {}ms initial delay, x{} backoff",
            config.jobs.max_attempts, config.jobs.poll_interval_ms, config.jobs.backoff_factor
        );
    } else {
        println!("  Disabled");
    }

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    println!("  Pages: {}", config.output.pages_path);
    println!("  Log: {}", config.output.log_path);
    println!("  Job results: {}", config.output.job_results_dir);

    println!("\nSites ({}):", sites.sites.len());
    for site in &sites.sites {
        println!("  - {}", site);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would process {} sites with {} at a time",
        sites.sites.len(),
        config.batch.max_concurrent_sites
    );
}

/// Handles the main batch run
async fn handle_batch(config: Config, sites: SiteList) -> anyhow::Result<()> {
    let sink = Arc::new(
        FileSink::create(&config.output).context("failed to open output files")?,
    );

    let summary = run_batch(config, sink, sites)
        .await
        .context("batch failed")?;
    summary.log();

    tracing::info!("Batch completed successfully");
    Ok(())
}
