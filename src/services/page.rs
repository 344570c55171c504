// src/services/page.rs

//! Dashboard page model extraction.
//!
//! Everything that knows how the dashboard lays out its HTML lives here. The
//! rest of the crate only sees the validated [`DashboardSnapshot`].
//!
//! The page carries two visually similar tables under the same id. They are
//! told apart by order: the first is the overall table, the second the
//! per-department table. Any deviation from that layout is a parse error,
//! never an empty result.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{DashboardSnapshot, DepartmentRecord, OverallStats, PageLocale, PageSelectors};
use crate::services::dates::LongDateFormat;

/// Compiled selectors and date format for one dashboard layout.
#[derive(Debug, Clone)]
pub struct PageParser {
    table: Selector,
    date_container: Selector,
    date: Selector,
    row: Selector,
    header_cell: Selector,
    data_cell: Selector,
    head_cells: Selector,
    body_cells: Selector,
    table_selector: String,
    date_format: LongDateFormat,
}

impl PageParser {
    pub fn new(selectors: &PageSelectors, locale: PageLocale) -> Result<Self> {
        Ok(Self {
            table: parse_selector(&selectors.table_selector)?,
            date_container: parse_selector(&selectors.date_container_selector)?,
            date: parse_selector(&selectors.date_selector)?,
            row: parse_selector("tr")?,
            header_cell: parse_selector("th")?,
            data_cell: parse_selector("td")?,
            head_cells: parse_selector("thead tr th")?,
            body_cells: parse_selector("tbody td")?,
            table_selector: selectors.table_selector.clone(),
            date_format: LongDateFormat::new(locale)?,
        })
    }

    pub fn locale(&self) -> &PageLocale {
        self.date_format.locale()
    }

    /// Extract the date the statistics describe.
    pub fn report_date(&self, document: &Html) -> Result<NaiveDate> {
        let container = document.select(&self.date_container).next().ok_or_else(|| {
            AppError::parse("report_date", "date container not found on page")
        })?;
        let fragment = container
            .select(&self.date)
            .next()
            .ok_or_else(|| AppError::parse("report_date", "date element not found in container"))?;

        self.date_format.parse(&fragment.text().collect::<String>())
    }

    /// Extract the overall table as status label → raw count.
    pub fn overall_stats(&self, document: &Html) -> Result<OverallStats> {
        let table = self.nth_table(document, 0, "overall_stats")?;

        let mut stats = OverallStats::new();
        for (index, row) in table.select(&self.row).enumerate() {
            let label = row.select(&self.header_cell).next();
            let value = row.select(&self.data_cell).next();
            match (label, value) {
                (Some(label), Some(value)) => stats.insert(cell_text(label), cell_text(value)),
                _ => {
                    return Err(AppError::parse(
                        "overall_stats",
                        format!("row {index} lacks a header/data cell pair"),
                    ));
                }
            }
        }

        if stats.is_empty() {
            return Err(AppError::parse("overall_stats", "overall table has no rows"));
        }
        Ok(stats)
    }

    /// Extract the per-department table as one record per row.
    ///
    /// Body cells are read in document order and sliced into chunks of the
    /// header width, so rows the markup failed to close still line up.
    pub fn department_stats(&self, document: &Html) -> Result<Vec<DepartmentRecord>> {
        let table = self.nth_table(document, 1, "department_stats")?;

        let headers: Vec<String> = table.select(&self.head_cells).map(cell_text).collect();
        if headers.is_empty() {
            return Err(AppError::parse("department_stats", "table has no header cells"));
        }

        let cells: Vec<String> = table.select(&self.body_cells).map(cell_text).collect();
        if cells.is_empty() {
            return Err(AppError::parse("department_stats", "table has no body cells"));
        }
        if cells.len() % headers.len() != 0 {
            return Err(AppError::parse(
                "department_stats",
                format!(
                    "{} body cells do not divide into rows of {} columns",
                    cells.len(),
                    headers.len()
                ),
            ));
        }

        Ok(cells
            .chunks(headers.len())
            .map(|row| headers.iter().cloned().zip(row.iter().cloned()).collect())
            .collect())
    }

    /// Run every extraction over one parsed document.
    pub fn snapshot(&self, document: &Html) -> Result<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            report_date: self.report_date(document)?,
            overall: self.overall_stats(document)?,
            departments: self.department_stats(document)?,
        })
    }

    fn nth_table<'a>(&self, document: &'a Html, n: usize, context: &str) -> Result<ElementRef<'a>> {
        document.select(&self.table).nth(n).ok_or_else(|| {
            AppError::parse(
                context,
                format!("table #{} matching '{}' not found", n + 1, self.table_selector),
            )
        })
    }
}

/// Cell text as rendered, with only the surrounding whitespace trimmed.
///
/// Labels and department names become warehouse natural keys, so inner
/// whitespace (including non-breaking spaces) is kept as is.
fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
