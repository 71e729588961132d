//! Sumi-Scribe main entry point
//!
//! This is the command-line interface for the Sumi-Scribe article scraper.

use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_scribe::config::{load_config, Config};
use sumi_scribe::crawler::{build_context, run_workers, WorkerManager};
use sumi_scribe::output::{print_history_stats, render_json, OutputFormat, ScrapeStats};
use sumi_scribe::sitemap::discover_sitemap;
use sumi_scribe::storage::{open_history, HistoryStore};
use sumi_scribe::url::{is_sitemap_url, Verdict};
use sumi_scribe::ScrapeOutcome;
use tracing_subscriber::EnvFilter;

/// Sumi-Scribe: An article scraper
///
/// Sumi-Scribe scrapes blog articles from single URLs, sitemaps or whole sites,
/// and saves them as JSON, text or Markdown files.
#[derive(Parser, Debug)]
#[command(name = "sumi-scribe")]
#[command(version = "1.0.0")]
#[command(about = "An article scraper for blogs and news sites", long_about = None)]
struct Cli {
    /// Single URL to scrape; a site root switches to sitemap discovery
    #[arg(short, long)]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Scrape from a sitemap
    #[arg(short, long)]
    sitemap: bool,

    /// Direct sitemap URL
    #[arg(long, requires = "sitemap")]
    sitemap_url: Option<String>,

    /// Site whose sitemap should be discovered
    #[arg(long, requires = "sitemap")]
    base_url: Option<String>,

    /// Maximum articles to scrape from a sitemap
    #[arg(short, long)]
    max: Option<usize>,

    /// Delay between requests in seconds
    #[arg(short, long, value_parser = parse_delay)]
    delay: Option<u64>,

    /// Output directory
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: json, txt or md
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Minimum URL path depth for a single post
    #[arg(long)]
    min_depth: Option<usize>,

    /// Regex that sitemap URLs must match
    #[arg(long)]
    url_filter: Option<String>,

    /// Path to the scrape history database
    #[arg(long)]
    history: Option<String>,

    /// Do not skip or record already scraped URLs
    #[arg(long)]
    no_history: bool,

    /// Scrape a single URL even if it does not look like a post
    #[arg(long)]
    skip_validation: bool,

    /// Classify the URLs and show what would be scraped without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "clear_history"])]
    dry_run: bool,

    /// Show statistics from the scrape history and exit
    #[arg(long, conflicts_with_all = ["dry_run", "clear_history"])]
    stats: bool,

    /// Forget every scraped URL and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    clear_history: bool,

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

    let config = match effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&cli, &config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.clear_history {
        handle_clear_history(&config)?;
    } else if cli.sitemap {
        handle_sitemap(&cli, &config).await?;
    } else if let Some(url) = &cli.url {
        handle_single(url, cli.skip_validation, &config).await?;
    } else if cli.config.is_some() {
        handle_config(&config).await?;
    } else {
        return Err("nothing to scrape: pass --url, --sitemap or --config".into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scribe=info,warn"),
            1 => EnvFilter::new("sumi_scribe=debug,info"),
            2 => EnvFilter::new("sumi_scribe=trace,debug"),
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

/// Parses a delay in seconds into milliseconds
fn parse_delay(value: &str) -> Result<u64, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("delay must be a non-negative number, got {}", value));
    }
    Ok((secs * 1000.0).round() as u64)
}

/// Loads the configuration file, if any, and applies the command-line overrides
fn effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(max) = cli.max {
        config.scraper.max_articles = Some(max);
    }
    if let Some(delay_ms) = cli.delay {
        config.scraper.request_delay_ms = delay_ms;
    }
    if let Some(depth) = cli.min_depth {
        config.scraper.min_path_depth = depth;
    }
    if let Some(filter) = &cli.url_filter {
        config.scraper.url_filter = Some(filter.clone());
    }
    if let Some(directory) = &cli.output {
        config.output.directory = directory.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(history) = &cli.history {
        config.output.history_path = history.clone();
    }
    if cli.no_history {
        config.output.prevent_duplicates = false;
    }

    config.validate()?;
    Ok(config)
}

/// Handles the --dry-run mode: shows how each URL would be handled
fn handle_dry_run(cli: &Cli, config: &Config) {
    println!("=== Sumi-Scribe Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Minimum path depth: {}", config.scraper.min_path_depth);
    println!("  Request delay: {}ms", config.scraper.request_delay_ms);
    match config.scraper.max_articles {
        Some(max) => println!("  Max articles per sitemap: {}", max),
        None => println!("  Max articles per sitemap: unlimited"),
    }
    if let Some(filter) = &config.scraper.url_filter {
        println!("  URL filter: {}", filter);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Format: {}", config.output.format);
    if config.output.prevent_duplicates {
        println!("  History: {}", config.output.history_path);
    } else {
        println!("  History: disabled");
    }

    let mut urls = config.urls.clone();
    urls.extend(cli.url.iter().cloned());
    urls.extend(cli.sitemap_url.iter().cloned());
    urls.extend(cli.base_url.iter().cloned());

    let classifier = config.classifier();
    println!("\nURLs ({}):", urls.len());
    for url in &urls {
        let classification = classifier.classify(url);
        let plan = if is_sitemap_url(url) {
            "sitemap".to_string()
        } else if classification.verdict == Verdict::RootDomain {
            "discover sitemap".to_string()
        } else if classification.is_valid {
            "scrape".to_string()
        } else {
            format!("skip ({})", classification.reason)
        };
        println!("  - {} -> {}", url, plan);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the scrape history
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("History: {}\n", config.output.history_path);

    let history = open_history(Path::new(&config.output.history_path))?;
    let total = history.count()?;
    let per_domain = history.count_by_domain()?;
    print_history_stats(total, &per_domain);

    Ok(())
}

/// Handles the --clear-history mode
fn handle_clear_history(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let history = open_history(Path::new(&config.output.history_path))?;
    let forgotten = history.count()?;
    history.clear()?;

    println!(
        "✓ Cleared {} URL(s) from {}",
        forgotten, config.output.history_path
    );
    Ok(())
}

/// Handles the config mode: runs every configured URL through domain workers
async fn handle_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.worker.enabled {
        tracing::info!(
            "Starting worker mode, cycle delay {}s (Ctrl-C to stop)",
            config.worker.cycle_delay_secs
        );
    }
    tracing::info!(
        "Loaded {} URL(s), output format {}",
        config.urls.len(),
        config.output.format
    );

    match run_workers(config).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --sitemap mode: scrapes a given or discovered sitemap
async fn handle_sitemap(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let context = build_context(config)?;

    let sitemap_url = match (&cli.sitemap_url, cli.base_url.as_ref().or(cli.url.as_ref())) {
        (Some(url), _) => url.clone(),
        (None, Some(base_url)) => {
            tracing::info!("Discovering sitemap for {}", base_url);
            match discover_sitemap(context.scraper.fetcher(), base_url).await {
                Some(url) => url,
                None => return Err(format!("no sitemap found for {}", base_url).into()),
            }
        }
        (None, None) => return Err("--sitemap needs --sitemap-url, --base-url or --url".into()),
    };

    let manager = WorkerManager::new(context);
    let stats = manager.run_sitemap_until_ctrl_c(&sitemap_url).await;
    print_run_summary(&stats);
    Ok(())
}

/// Handles the single URL mode
///
/// A site root is routed through sitemap discovery; anything else is scraped
/// directly and printed as JSON.
async fn handle_single(
    url: &str,
    skip_validation: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let context = build_context(config)?;

    if context.scraper.classifier().is_domain_root(url) {
        tracing::info!("Root domain detected, discovering sitemap: {}", url);
        let manager = WorkerManager::new(context);
        let stats = manager.run_until_ctrl_c(&[url.to_string()]).await;
        print_run_summary(&stats);
        return Ok(());
    }

    let article = match context.scraper.scrape(url, !skip_validation).await {
        ScrapeOutcome::Article(article) => article,
        ScrapeOutcome::Skipped { reason } => {
            println!("Skipped {}: {}", url, reason);
            return Ok(());
        }
        ScrapeOutcome::FetchFailed { error } => {
            return Err(format!("could not fetch {}: {}", url, error).into());
        }
        ScrapeOutcome::Rejected { reason } => {
            return Err(format!("could not scrape {}: {}", url, reason).into());
        }
    };

    let location = context.sink.save(&article)?;
    if let Some(history) = &context.history {
        history.mark_seen(&article.url, &article.title)?;
    }
    tracing::info!("Saved to {}", location);

    println!("\n{}", "=".repeat(60));
    println!("SCRAPED CONTENT (JSON)");
    println!("{}", "=".repeat(60));
    println!("{}", render_json(&article)?);

    Ok(())
}

fn print_run_summary(stats: &ScrapeStats) {
    println!("\n✓ {}", stats);
}
