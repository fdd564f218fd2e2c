//! Mail-Ripple main entry point
//!
//! This is the command-line interface for the Mail-Ripple email harvester.

use anyhow::Context;
use clap::Parser;
use mail_ripple::config::{load_config_with_hash, validate, Config};
use mail_ripple::crawler::{run_batches, BatchOrchestrator, SiteCrawler};
use mail_ripple::input::{SeedSource, SqliteSeedSource};
use mail_ripple::output::{
    print_statistics, MarkdownSummaryHandler, OutputFanout, SqliteOutputHandler, TsvOutputHandler,
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Mail-Ripple: a bounded breadth-first email harvester
///
/// Reads seed homepages from a SQLite database, crawls outward from each one
/// a bounded number of pages and hostnames, and writes every email address
/// found to one tab-separated file per batch.
#[derive(Parser, Debug)]
#[command(name = "mail-ripple")]
#[command(version)]
#[command(about = "A bounded breadth-first email harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Number of max iterations per crawl (overrides the config file)
    #[arg(long = "niter", value_name = "N", alias = "max-iterations")]
    max_iterations: Option<i64>,

    /// Number of max domains per crawl (overrides the config file)
    #[arg(long = "maxd", value_name = "N", alias = "max-domains")]
    max_domains: Option<i64>,

    /// Number of concurrent crawls (overrides the config file)
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// Number of seeds per output batch (overrides the config file)
    #[arg(long, value_name = "N")]
    batch_size: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and count the seeds without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(n) = self.max_iterations {
            config.crawler.max_iterations = n;
        }
        if let Some(n) = self.max_domains {
            config.crawler.max_domains = n;
        }
        if let Some(n) = self.workers {
            config.crawler.workers = n;
        }
        if let Some(n) = self.batch_size {
            config.crawler.batch_size = n;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    validate(&config).context("invalid command-line override")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let source = SqliteSeedSource::new(&config.input.database_path, config.input.query.clone());
    let records = source
        .load_seeds()
        .with_context(|| format!("failed to read seeds from {}", config.input.database_path))?;

    if cli.dry_run {
        handle_dry_run(&config, records.len());
        return Ok(());
    }

    handle_crawl(config, config_hash, records).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mail_ripple=info,warn"),
            1 => EnvFilter::new("mail_ripple=debug,info"),
            2 => EnvFilter::new("mail_ripple=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, seed_count: usize) {
    println!("=== Mail-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max iterations: {}", config.crawler.max_iterations);
    println!("  Max domains: {}", config.crawler.max_domains);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Batch size: {}", config.crawler.batch_size);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    println!("\nInput:");
    println!("  Database: {}", config.input.database_path);
    println!("  Seeds: {}", seed_count);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    if let Some(db) = &config.output.database_path {
        println!("  Database: {}", db);
    }
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} seeds in {} batches",
        seed_count,
        seed_count.div_ceil(config.crawler.batch_size as usize)
    );
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: String,
    records: Vec<mail_ripple::SeedRecord>,
) -> anyhow::Result<()> {
    let mut output = OutputFanout::new();
    output.push(Box::new(TsvOutputHandler::new(&config.output.directory)?));
    if let Some(db) = &config.output.database_path {
        output.push(Box::new(SqliteOutputHandler::new(Path::new(db))?));
    }
    if let Some(summary) = &config.output.summary_path {
        output.push(Box::new(
            MarkdownSummaryHandler::new(summary).with_config_hash(config_hash),
        ));
    }

    let crawler = SiteCrawler::from_config(&config)?;
    let limits = crawler.limits();
    tracing::info!(
        "Each crawl stops after {} iterations or {} domains",
        limits.max_iterations,
        limits.max_domains
    );

    // Ctrl-C stops in-flight crawls; their keys are left out of the output
    let cancel = CancellationToken::new();
    let orchestrator = BatchOrchestrator::new(crawler, config.crawler.workers as usize)
        .with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling crawls");
            cancel.cancel();
        }
    });

    let stats = run_batches(
        &orchestrator,
        &records,
        config.crawler.batch_size as usize,
        &mut output,
    )
    .await;

    print_statistics(&stats);

    if stats.cancelled {
        tracing::warn!("Run cancelled after {} batches", stats.batches_written);
    } else {
        tracing::info!("Run completed: {} email rows written", stats.rows_written);
    }

    Ok(())
}
