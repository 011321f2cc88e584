//! Email-Hunter main entry point
//!
//! This is the command-line interface for the Email-Hunter contact crawler.

use anyhow::Context;
use clap::Parser;
use email_hunter::config::{load_config_with_hash, validate, CrawlConfig};
use email_hunter::output::{print_report, write_csv_file, OutputError, Record};
use email_hunter::{Coordinator, HunterError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Email-Hunter: a domain-restricted email and phone crawler
///
/// Email-Hunter crawls from seed URLs while respecting robots.txt and a
/// request rate, and records emails whose domain is on the allow-list
/// (optionally phone numbers too) to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "email-hunter")]
#[command(version = "1.0.0")]
#[command(about = "Email/Phone Hunter (domain-restricted)", long_about = None)]
struct Cli {
    /// Allowed base domains; only emails ending with these are recorded (subdomains allowed)
    #[arg(long, num_args = 1.., value_delimiter = ',', required_unless_present = "config")]
    domains: Vec<String>,

    /// Seed URLs to fetch first
    #[arg(long, num_args = 1.., value_delimiter = ',', required_unless_present = "config")]
    start_urls: Vec<String>,

    /// TOML configuration file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV output path
    #[arg(long, default_value = "findings.csv")]
    output: PathBuf,

    /// Max total pages to fetch [default: 80]
    #[arg(long)]
    max_pages: Option<u32>,

    /// Link-follow depth [default: 1]
    #[arg(long)]
    depth: Option<u32>,

    /// Seconds between requests [default: 1.0]
    #[arg(long)]
    rate: Option<f64>,

    /// Parse PDFs
    #[arg(long)]
    include_pdfs: bool,

    /// Also extract phone numbers
    #[arg(long)]
    include_phones: bool,

    /// Respect robots.txt [default: true]
    #[arg(long, value_name = "true|false")]
    honor_robots: Option<bool>,

    /// Allow following links to other sites (emails still filtered to allowed domains)
    #[arg(long)]
    external_follow: bool,

    /// Custom user-agent; a real browser user-agent is picked if omitted
    #[arg(long)]
    user_agent: Option<String>,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            if is_output_error(&e) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn is_output_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<OutputError>().is_some()
        || matches!(e.downcast_ref::<HunterError>(), Some(HunterError::Output(_)))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_hunter=info,warn"),
            1 => EnvFilter::new("email_hunter=debug,info"),
            2 => EnvFilter::new("email_hunter=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(config, &cli).await
}

/// Builds the crawl configuration from the config file and flags
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => CrawlConfig::new(cli.domains.clone(), cli.start_urls.clone()),
    };

    if !cli.domains.is_empty() {
        config.allowed_domains = cli.domains.clone();
    }
    if !cli.start_urls.is_empty() {
        config.seed_urls = cli.start_urls.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if let Some(rate) = cli.rate {
        config.rate_interval = rate;
    }
    if let Some(honor_robots) = cli.honor_robots {
        config.honor_robots = honor_robots;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    config.include_pdfs |= cli.include_pdfs;
    config.include_phones |= cli.include_phones;
    config.external_follow |= cli.external_follow;

    config.normalize_domains();
    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &CrawlConfig) -> anyhow::Result<()> {
    println!("=== Email-Hunter Dry Run ===\n");

    println!("Crawl Limits:");
    println!("  Max pages: {}", config.max_pages);
    println!("  Max depth: {}", config.max_depth);
    println!("  Rate interval: {}s", config.rate_interval);
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!(
        "  Retries: {} attempt(s), {} retry after 403",
        config.retry.max_attempts, config.retry.forbidden_retries
    );

    println!("\nPolicy:");
    println!("  Honor robots.txt: {}", config.honor_robots);
    println!("  Follow external links: {}", config.external_follow);
    println!("  Include PDFs: {}", config.include_pdfs);
    println!("  Include phones: {}", config.include_phones);
    println!("  User agent: {}", config.user_agent);

    println!("\nAllowed Domains ({}):", config.allowed_domains.len());
    for domain in &config.allowed_domains {
        println!("  - {}", domain);
    }

    println!("\nSeed URLs ({}):", config.seed_urls.len());
    for seed in &config.seed_urls {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig, cli: &Cli) -> anyhow::Result<()> {
    tracing::info!(
        "Allowed domains: {}, seed URLs: {}",
        config.allowed_domains.join(", "),
        config.seed_urls.len()
    );

    let mut coordinator = Coordinator::new(config)?;
    let mut records: Vec<Record> = Vec::new();

    let report = match coordinator.run(&mut records).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            report
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let rows = write_csv_file(&cli.output, &records)
        .with_context(|| format!("Could not write CSV to {}", cli.output.display()))?;

    if !cli.quiet {
        print_report(&report);
    }

    println!(
        "[OK] Found: {} items (emails+phones+info) | Pages fetched: {} | Output: {}",
        rows,
        report.pages_fetched,
        cli.output.display()
    );

    Ok(())
}
