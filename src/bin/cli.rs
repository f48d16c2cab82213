//! Job crawler CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use job_crawler::{
    error::Result,
    fetcher::HttpFetcher,
    models::Config,
    pipeline::{self, CrawlParams},
    storage::LocalStorage,
};

/// Job search crawler
#[derive(Parser, Debug)]
#[command(
    name = "job-crawler",
    version,
    about = "Walks paginated job search results and extracts filtered job records"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "crawler.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl search results and write qualifying jobs
    Crawl {
        /// Job query (default from config)
        #[arg(long)]
        query: Option<String>,

        /// Location for the job search (default from config)
        #[arg(long)]
        location: Option<String>,

        /// Seconds to let each listing page settle
        #[arg(long)]
        wait_time: Option<u64>,

        /// Sign in manually before crawling
        #[arg(long)]
        auth: bool,

        /// Output directory (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// List the jobs stored in a results file
    Show {
        /// Results file, absolute or relative to the output directory
        file: String,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Crawl {
            query,
            location,
            wait_time,
            auth,
            output,
        } => {
            config.validate()?;

            let defaults = CrawlParams::from_config(&config);
            let params = CrawlParams {
                query: query.unwrap_or(defaults.query),
                location: location.unwrap_or(defaults.location),
                wait_secs: wait_time,
            };

            let mut fetcher = HttpFetcher::new(&config.crawler)?;
            if auth {
                let cookies = pipeline::authenticate(&config, &fetcher, &params).await?;
                fetcher = fetcher.with_cookies(cookies);
            }

            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output.dir));
            let mut storage = LocalStorage::new(output_dir);
            if !config.output.pretty {
                storage = storage.compact();
            }

            pipeline::run_crawler(&config, &fetcher, &storage, &params).await?;
        }

        Command::Validate => pipeline::run_validate(&config)?,

        Command::Show { file } => {
            let storage = LocalStorage::new(&config.output.dir);
            pipeline::run_show(&storage, &file).await?;
        }
    }

    Ok(())
}
