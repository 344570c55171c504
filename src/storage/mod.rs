//! Warehouse abstractions for statistics persistence.
//!
//! Star schema written by the crawler:
//!
//! ```text
//! date_dim        (date_sk, date_date UNIQUE)
//! status_dim      (status_sk, status_name UNIQUE)
//! department_dim  (department_sk, department_name UNIQUE)
//! overall_facts   (date_sk, status_sk, count)                 UNIQUE(date_sk, status_sk)
//! department_facts(date_sk, department_sk, status_sk, count)  UNIQUE(date_sk, department_sk, status_sk)
//! ```
//!
//! Dimension rows are find-or-create and never change once written. Fact rows
//! are upserted, last write wins on `count`.

pub mod memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Count, DateKey, DepartmentKey, StatusKey};

// Re-export for convenience
pub use memory::MemoryWarehouse;
pub use postgres::PostgresWarehouse;

/// Trait for warehouse backends.
///
/// Every method is its own unit of work: once it returns `Ok`, the row is
/// committed regardless of what the caller does next.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Key of the `date_dim` row for `date`, creating it if absent.
    async fn resolve_date(&self, date: NaiveDate) -> Result<DateKey>;

    /// Key of the `status_dim` row named `name`, creating it if absent.
    async fn resolve_status(&self, name: &str) -> Result<StatusKey>;

    /// Key of the `department_dim` row named `name`, creating it if absent.
    async fn resolve_department(&self, name: &str) -> Result<DepartmentKey>;

    /// Insert or overwrite the overall count for (date, status).
    async fn upsert_overall_fact(
        &self,
        date: DateKey,
        status: StatusKey,
        count: Count,
    ) -> Result<()>;

    /// Insert or overwrite the count for (date, department, status).
    async fn upsert_department_fact(
        &self,
        date: DateKey,
        department: DepartmentKey,
        status: StatusKey,
        count: Count,
    ) -> Result<()>;
}
