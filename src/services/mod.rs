//! Service layer for the crawler application.
//!
//! This module contains the extraction logic:
//! - Dashboard fetching (`DashboardCrawler`)
//! - Page model extraction (`PageParser`)
//! - Localized date parsing (`LongDateFormat`)

mod dashboard;
pub mod dates;
pub mod page;

pub use dashboard::DashboardCrawler;
pub use dates::{LongDateFormat, parse_long_date};
pub use page::PageParser;
