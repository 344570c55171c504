// src/services/dashboard.rs

//! Dashboard crawler service.
//!
//! Fetches the dashboard page and hands the parsed document to
//! [`PageParser`].

use chrono::NaiveDate;
use reqwest::Client;
use scraper::Html;

use crate::error::Result;
use crate::models::{Config, DashboardSnapshot, DepartmentRecord, OverallStats};
use crate::services::PageParser;
use crate::utils::http;

/// Service for fetching statistics from the COVID dashboard.
pub struct DashboardCrawler {
    client: Client,
    url: String,
    parser: PageParser,
}

impl DashboardCrawler {
    /// Create a new crawler with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = http::create_async_client(&config.crawler)?;
        let parser = PageParser::new(&config.selectors, config.locale.clone())?;
        Ok(Self::with_client(client, &config.crawler.website_url, parser))
    }

    /// Create a crawler around an existing client and parser.
    pub fn with_client(client: Client, url: impl Into<String>, parser: PageParser) -> Self {
        Self {
            client,
            url: url.into(),
            parser,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parser(&self) -> &PageParser {
        &self.parser
    }

    /// Fetch the page once and extract everything from it.
    pub async fn fetch_snapshot(&self) -> Result<DashboardSnapshot> {
        let document = self.fetch_document().await?;
        let snapshot = self.parser.snapshot(&document)?;
        log::debug!(
            "Snapshot for {}: {} overall statuses, {} departments",
            snapshot.report_date,
            snapshot.overall.len(),
            snapshot.departments.len()
        );
        Ok(snapshot)
    }

    /// Fetch the page and extract its reporting date.
    pub async fn fetch_report_date(&self) -> Result<NaiveDate> {
        let document = self.fetch_document().await?;
        self.parser.report_date(&document)
    }

    /// Fetch the page and extract the overall status table.
    pub async fn fetch_overall_stats(&self) -> Result<OverallStats> {
        let document = self.fetch_document().await?;
        self.parser.overall_stats(&document)
    }

    /// Fetch the page and extract the per-department table.
    pub async fn fetch_department_stats(&self) -> Result<Vec<DepartmentRecord>> {
        let document = self.fetch_document().await?;
        self.parser.department_stats(&document)
    }

    async fn fetch_document(&self) -> Result<Html> {
        log::debug!("Fetching {}", self.url);
        http::fetch_page_async(&self.client, &self.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_new_uses_configured_url() {
        let mut config = Config::default();
        config.crawler.website_url = "https://example.org/dashboard".to_string();
        let crawler = DashboardCrawler::new(&config).unwrap();
        assert_eq!(crawler.url(), "https://example.org/dashboard");
        assert_eq!(crawler.parser().locale().date_connector, "de");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let mut config = Config::default();
        // Port 9 on loopback refuses connections.
        config.crawler.website_url = "http://127.0.0.1:9/".to_string();
        config.crawler.timeout_secs = 2;
        let crawler = DashboardCrawler::new(&config).unwrap();

        let err = crawler.fetch_overall_stats().await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
