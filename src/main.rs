//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner record harvester.

use clap::Parser;
use gleaner::config::{load_config_with_hash, mask_secret, resolve_api_key, validate, Config};
use gleaner::output::{print_report, write_markdown_report, write_records_json};
use gleaner::Coordinator;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Gleaner: a goal-directed record harvester
///
/// Gleaner crawls a single website, discovering candidate pages and
/// extracting structured records that match a goal, within a fixed budget
/// and a polite request rate.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A goal-directed record harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the start URL
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Override the goal
    #[arg(long, value_name = "TEXT")]
    goal: Option<String>,

    /// Override the maximum number of records
    #[arg(long, value_name = "N")]
    max_records: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Categorize links by URL shape instead of the language model
    #[arg(long)]
    offline_categorizer: bool,
}

impl Cli {
    /// Applies command-line overrides to a loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(start_url) = &self.start_url {
            config.run.start_url = start_url.clone();
        }
        if let Some(goal) = &self.goal {
            config.run.goal = goal.clone();
        }
        if let Some(max_records) = self.max_records {
            config.run.max_records = max_records;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration after overrides: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.offline_categorizer);
        return Ok(());
    }

    let api_key = match resolve_api_key(&config.llm) {
        Ok(key) => {
            tracing::info!("API key loaded: {}", mask_secret(&key));
            key
        }
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    handle_crawl(&config, &config_hash, &api_key, cli.offline_categorizer).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, offline_categorizer: bool) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Run:");
    println!("  Start URL: {}", config.run.start_url);
    println!("  Goal: {}", config.run.goal);
    println!("  Max records: {}", config.run.max_records);
    match config.run.max_run_time() {
        Some(limit) => println!("  Time limit: {}s", limit.as_secs()),
        None => println!("  Time limit: none"),
    }

    println!("\nBudget:");
    println!(
        "  Min request interval: {}ms",
        config.budget.min_request_interval_ms
    );
    println!("  Max retries: {}", config.budget.max_retries);
    println!("  Max errors: {}", config.budget.max_errors);
    println!("  Detail lookahead: {}", config.budget.detail_lookahead);
    println!("  Navigation cap: {}", config.budget.navigation_cap);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nLanguage Model:");
    println!("  Endpoint: {}", config.llm.base_url);
    println!("  Model: {}", config.llm.model);
    println!("  API key variable: {}", config.llm.api_key_env);
    println!(
        "  Link categorizer: {}",
        if offline_categorizer { "offline heuristics" } else { "model" }
    );

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    api_key: &str,
    offline_categorizer: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Collecting up to {} records from {}",
        config.run.max_records,
        config.run.start_url
    );

    let coordinator = match Coordinator::from_config(config, api_key, offline_categorizer) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!("Failed to set up crawl: {}", e);
            return Err(e.into());
        }
    };

    // Ctrl-C stops the run at the next step boundary
    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current step");
            token.cancel();
        }
    });

    let report = coordinator.run().await;

    write_records_json(&report.records, Path::new(&config.output.records_path))?;
    write_markdown_report(
        &report,
        config_hash,
        Path::new(&config.output.summary_path),
    )?;
    tracing::info!("Summary written to {}", config.output.summary_path);

    print_report(&report);

    Ok(())
}
