// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod keys;
mod locale;
mod selectors;
mod stats;

// Re-export all public types
pub use config::{Config, CrawlerConfig, DatabaseConfig, DepartmentColumns, StatusColumn};
pub use keys::{DateKey, DepartmentKey, StatusKey};
pub use locale::PageLocale;
pub use selectors::PageSelectors;
pub use stats::{Count, DashboardSnapshot, DepartmentRecord, OverallStats, RawRecord};
