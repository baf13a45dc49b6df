//! Koohii-Mirror main entry point
//!
//! This is the command-line interface for downloading and checking a page mirror.

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use koohii_mirror::config::{read_config_with_hash, validate, validate_credentials, Config};
use koohii_mirror::crawler::{CrawlSettings, Crawler};
use koohii_mirror::integrity::audit_directory;
use koohii_mirror::output::{print_crawl_summary, print_integrity_report, CrawlSummary};
use koohii_mirror::range::{coerce_codepoint, Codepoint};
use koohii_mirror::session::KoohiiSession;
use koohii_mirror::store::DirectoryStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Koohii-Mirror: a resumable, rate-limited page mirror
///
/// Logs in once per run, downloads one study page per codepoint with a fixed
/// delay between requests, and retries whole runs on failure. Runs without a
/// range resume after the highest page already saved.
#[derive(Parser, Debug)]
#[command(name = "koohii-mirror")]
#[command(version)]
#[command(about = "A resumable, rate-limited page mirror", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download pages into the output directory
    Crawl(CrawlArgs),

    /// Check the output directory for missing pages
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Login name
    #[arg(short, long, env = "KOOHII_USERNAME")]
    username: Option<String>,

    /// Login password
    #[arg(short, long, env = "KOOHII_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Directory to save pages into
    #[arg(short, long, value_name = "DIRECTORY")]
    output: Option<PathBuf>,

    /// Delay after each page (milliseconds)
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Codepoints to fetch: "a,b,c", "lower..upper", or a single codepoint.
    /// Omit to resume after the highest saved page.
    #[arg(short, long, value_name = "SPEC")]
    range: Option<String>,

    /// Maximum number of full runs
    #[arg(short, long)]
    attempts: Option<u32>,

    /// Show what would be crawled without logging in
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory with downloaded pages
    #[arg(short, long, value_name = "DIRECTORY")]
    input: Option<PathBuf>,

    /// First expected codepoint (number or character)
    #[arg(long, value_parser = parse_codepoint)]
    lower: Option<Codepoint>,

    /// Last expected codepoint (number or character)
    #[arg(long, value_parser = parse_codepoint)]
    upper: Option<Codepoint>,
}

fn parse_codepoint(token: &str) -> Result<Codepoint, String> {
    coerce_codepoint(token)
        .ok_or_else(|| format!("'{}' is neither a number nor a single character", token))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Crawl(args) => handle_crawl(args).await,
        Command::Check(args) => handle_check(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("koohii_mirror=info,warn"),
            1 => EnvFilter::new("koohii_mirror=debug,info"),
            2 => EnvFilter::new("koohii_mirror=trace,debug"),
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

/// Loads the configuration file if given, otherwise the defaults
fn base_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = read_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the crawl command
async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<ExitCode> {
    let mut config = base_config(args.config.as_deref())?;

    if let Some(username) = args.username {
        config.session.username = username;
    }
    if let Some(password) = args.password {
        config.session.password = password;
    }
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.crawler.delay_ms = delay_ms;
    }
    if let Some(range) = args.range {
        config.crawler.range = Some(range);
    }
    if let Some(attempts) = args.attempts {
        config.crawler.attempts = attempts;
    }

    validate(&config)?;
    let settings = CrawlSettings::from_config(&config)?;
    let session = KoohiiSession::new(&config.session)?;

    if args.dry_run {
        let store = DirectoryStore::new(&config.output.directory, config.output.naming());
        let crawler = Crawler::new(session, store, settings);
        print_dry_run(&config, &crawler);
        return Ok(ExitCode::SUCCESS);
    }

    validate_credentials(&config.session)?;
    let store = DirectoryStore::create(&config.output.directory, config.output.naming())
        .context("failed to prepare output directory")?;
    let crawler = Crawler::new(session, store, settings);

    tracing::info!(
        "Crawling into {} with {}ms delay, up to {} attempts",
        config.output.directory.display(),
        config.crawler.delay_ms,
        config.crawler.attempts
    );

    let started_at = Utc::now();
    let retried = crawler.run_with_retries(config.crawler.attempts).await;
    let summary = CrawlSummary::new(started_at, config.crawler.attempts, &retried);
    print_crawl_summary(&summary);

    if summary.completed {
        tracing::info!("Crawl completed successfully");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("Terminated due to fatal error");
        Ok(ExitCode::FAILURE)
    }
}

/// Handles --dry-run: shows the resolved plan without logging in
fn print_dry_run(config: &Config, crawler: &Crawler<KoohiiSession, DirectoryStore>) {
    println!("=== Koohii-Mirror Dry Run ===\n");

    println!("Session:");
    println!("  Login URL: {}", crawler.session().login_url());
    println!("  Username: {}", config.session.username);

    println!("\nCrawler:");
    println!("  Delay: {}ms", config.crawler.delay_ms);
    println!("  Attempts: {}", config.crawler.attempts);
    println!(
        "  Domain: {}..{}",
        crawler.settings().domain.lower,
        crawler.settings().domain.upper
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());

    let plan: Vec<Codepoint> = crawler.plan().collect();
    let mode = if crawler.settings().range.is_resume() {
        "resume"
    } else {
        "explicit"
    };
    println!("\nPlan ({}):", mode);
    match (plan.first(), plan.last()) {
        (Some(first), Some(last)) => {
            println!("  {} codepoints, {} .. {}", plan.len(), first, last);
            if let Some(url) = crawler.session().page_url(*first) {
                println!("  First page: {}", url);
            }
        }
        _ => println!("  Nothing to do"),
    }
}

/// Handles the check command
fn handle_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let mut config = base_config(args.config.as_deref())?;

    if let Some(input) = args.input {
        config.output.directory = input;
    }
    if let Some(lower) = args.lower {
        config.domain.lower = lower.value();
    }
    if let Some(upper) = args.upper {
        config.domain.upper = upper.value();
    }

    validate(&config)?;
    let domain = config.domain.to_domain();

    let report = audit_directory(&config.output.directory, &config.output.naming(), domain)
        .context("failed to read page directory")?;
    print_integrity_report(&report, domain);

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
