// src/pipeline/crawl.rs

//! Full scrape-and-store run.

use crate::error::Result;
use crate::models::Config;
use crate::services::DashboardCrawler;
use crate::storage::Warehouse;

use super::load::{RunSummary, store_snapshot};

/// Fetch the dashboard once and write everything on it to the warehouse.
pub async fn run_pipeline(
    config: &Config,
    crawler: &DashboardCrawler,
    warehouse: &dyn Warehouse,
) -> Result<RunSummary> {
    log::info!("Crawling {} ...", crawler.url());
    let snapshot = crawler.fetch_snapshot().await?;
    log::info!("Crawling {} ... done!", crawler.url());

    store_snapshot(config, &snapshot, warehouse).await
}
