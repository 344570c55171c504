//! COVID dashboard crawler CLI
//!
//! One invocation performs one scrape-and-store cycle. Schedule it externally.

use std::path::PathBuf;

use clap::Parser;
use crawler::{
    error::Result,
    models::Config,
    pipeline,
    services::DashboardCrawler,
    storage::{MemoryWarehouse, PostgresWarehouse},
};

/// Scrape the COVID dashboard into the warehouse
#[derive(Parser, Debug)]
#[command(name = "covid-crawler", version, about = "COVID dashboard crawler")]
struct Cli {
    /// Path to configuration file (defaults are used if it is missing)
    #[arg(short, long, default_value = "crawler.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scrape and print the snapshot without touching the database
    #[arg(long)]
    dry_run: bool,
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

    log::info!("COVID crawler starting...");

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env()?;
    config.validate()?;
    log::debug!("Database settings: {:?}", config.database);

    let crawler = DashboardCrawler::new(&config)?;

    let summary = if cli.dry_run {
        let snapshot = crawler.fetch_snapshot().await?;
        let warehouse = MemoryWarehouse::new();
        let summary = pipeline::store_snapshot(&config, &snapshot, &warehouse).await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        summary
    } else {
        let warehouse = PostgresWarehouse::connect(&config.database).await?;
        pipeline::run_pipeline(&config, &crawler, &warehouse).await?
    };

    log::info!(
        "Stored {} overall facts and {} department facts for {} departments (date_sk {})",
        summary.overall_facts,
        summary.department_facts,
        summary.departments,
        summary.date_key
    );
    log::info!("Done!");

    Ok(())
}
