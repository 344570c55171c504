// src/models/selectors.rs

//! CSS selectors for locating the dashboard's data on the page.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping the dashboard.
///
/// Both stats tables share one id; the first match is the overall table and
/// the second the per-department table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSelectors {
    /// Selector matching both stats tables, in page order
    #[serde(default = "default_table_selector")]
    pub table_selector: String,

    /// Selector for the block that holds the report date
    #[serde(default = "default_date_container_selector")]
    pub date_container_selector: String,

    /// Selector for the date element within that block
    #[serde(default = "default_date_selector")]
    pub date_selector: String,
}

fn default_table_selector() -> String {
    "#tablePreview".to_string()
}

fn default_date_container_selector() -> String {
    ".mapanuevos".to_string()
}

fn default_date_selector() -> String {
    "h5".to_string()
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            table_selector: default_table_selector(),
            date_container_selector: default_date_container_selector(),
            date_selector: default_date_selector(),
        }
    }
}
