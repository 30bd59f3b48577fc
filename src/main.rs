//! Site-Mapper main entry point
//!
//! This is the command-line interface for the Site-Mapper crawler.

use clap::error::ErrorKind;
use clap::Parser;
use site_mapper::config::{load_config, validate, Config};
use site_mapper::crawler::crawl;
use site_mapper::output::{print_statistics, write_report};
use site_mapper::SiteMapError;
use std::fmt::Display;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: site-mapper DOMAIN FILE [LINK | ASSET]";

/// Site-Mapper: a concurrent single-domain site mapper
///
/// Site-Mapper visits every page reachable from DOMAIN exactly once and
/// writes each page with the resources it references to FILE.
#[derive(Parser, Debug)]
#[command(name = "site-mapper")]
#[command(version)]
#[command(about = "A concurrent single-domain site mapper", long_about = None)]
struct Cli {
    /// Domain to crawl, e.g. example.com or https://example.com/blog
    #[arg(value_name = "DOMAIN")]
    domain: String,

    /// File the page map is written to
    #[arg(value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// LINK follows pages, ASSET records the seed page's assets
    #[arg(value_name = "MODE")]
    mode: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Per-page fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            usage_exit();
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            fail(e);
        }
    };

    tracing::info!(
        "Crawling {} in {} mode with {} workers",
        cli.domain,
        config.crawler.mode,
        config.crawler.concurrency
    );

    let report = match crawl(&cli.domain, &config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            fail(e);
        }
    };

    print_statistics(&report.stats);
    println!("Writing to file...");

    if let Err(e) = write_report(&report.pages, &cli.output) {
        fail(e);
    }
}

/// Layers command-line values over the config file (or defaults) and validates the result
fn build_config(cli: &Cli) -> Result<Config, SiteMapError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(mode) = &cli.mode {
        config.crawler.mode = mode.clone();
    }

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }

    if let Some(timeout) = cli.timeout {
        config.crawler.fetch_timeout_secs = timeout;
        config.crawler.connect_timeout_secs = config.crawler.connect_timeout_secs.min(timeout);
    }

    validate(&config)?;
    Ok(config)
}

/// Prints the error's message, then the usage line, and exits with status 1
fn fail(error: impl Display) -> ! {
    eprintln!("{}", error);
    usage_exit();
}

fn usage_exit() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mapper=info,warn"),
            1 => EnvFilter::new("site_mapper=debug,info"),
            2 => EnvFilter::new("site_mapper=trace,debug"),
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
