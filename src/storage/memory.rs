//! In-memory warehouse implementation.
//!
//! Same find-or-create and upsert semantics as the PostgreSQL backend. Used
//! for dry runs and tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{Count, DateKey, DepartmentKey, StatusKey};
use crate::storage::Warehouse;

/// A dimension table: natural key → surrogate key, keys handed out from 1.
#[derive(Debug)]
struct Dimension<K> {
    rows: HashMap<K, i32>,
}

impl<K: Eq + Hash> Dimension<K> {
    fn resolve(&mut self, key: K) -> i32 {
        let next = self.rows.len() as i32 + 1;
        *self.rows.entry(key).or_insert(next)
    }

    fn contains_key(&self, sk: i32) -> bool {
        sk >= 1 && sk as usize <= self.rows.len()
    }
}

impl<K> Default for Dimension<K> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    dates: Dimension<NaiveDate>,
    statuses: Dimension<String>,
    departments: Dimension<String>,
    overall_facts: HashMap<(DateKey, StatusKey), Count>,
    department_facts: HashMap<(DateKey, DepartmentKey, StatusKey), Count>,
}

impl Tables {
    fn check_keys(
        &self,
        date: DateKey,
        department: Option<DepartmentKey>,
        status: StatusKey,
    ) -> Result<()> {
        if !self.dates.contains_key(date.get()) {
            return Err(AppError::persistence(format!("unknown date_sk {date}")));
        }
        if !self.statuses.contains_key(status.get()) {
            return Err(AppError::persistence(format!("unknown status_sk {status}")));
        }
        if let Some(department) = department {
            if !self.departments.contains_key(department.get()) {
                return Err(AppError::persistence(format!(
                    "unknown department_sk {department}"
                )));
            }
        }
        Ok(())
    }
}

/// Warehouse backend that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryWarehouse {
    tables: Mutex<Tables>,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn date_count(&self) -> usize {
        self.tables().dates.rows.len()
    }

    pub fn status_count(&self) -> usize {
        self.tables().statuses.rows.len()
    }

    pub fn department_count(&self) -> usize {
        self.tables().departments.rows.len()
    }

    pub fn overall_fact_count(&self) -> usize {
        self.tables().overall_facts.len()
    }

    pub fn department_fact_count(&self) -> usize {
        self.tables().department_facts.len()
    }

    /// Stored overall count for (date, status), if any.
    pub fn overall_fact(&self, date: DateKey, status: StatusKey) -> Option<Count> {
        self.tables().overall_facts.get(&(date, status)).copied()
    }

    /// Stored department count for (date, department, status), if any.
    pub fn department_fact(
        &self,
        date: DateKey,
        department: DepartmentKey,
        status: StatusKey,
    ) -> Option<Count> {
        self.tables()
            .department_facts
            .get(&(date, department, status))
            .copied()
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    async fn resolve_date(&self, date: NaiveDate) -> Result<DateKey> {
        Ok(DateKey(self.tables().dates.resolve(date)))
    }

    async fn resolve_status(&self, name: &str) -> Result<StatusKey> {
        Ok(StatusKey(self.tables().statuses.resolve(name.to_string())))
    }

    async fn resolve_department(&self, name: &str) -> Result<DepartmentKey> {
        Ok(DepartmentKey(
            self.tables().departments.resolve(name.to_string()),
        ))
    }

    async fn upsert_overall_fact(
        &self,
        date: DateKey,
        status: StatusKey,
        count: Count,
    ) -> Result<()> {
        let mut tables = self.tables();
        tables.check_keys(date, None, status)?;
        tables.overall_facts.insert((date, status), count);
        Ok(())
    }

    async fn upsert_department_fact(
        &self,
        date: DateKey,
        department: DepartmentKey,
        status: StatusKey,
        count: Count,
    ) -> Result<()> {
        let mut tables = self.tables();
        tables.check_keys(date, Some(department), status)?;
        tables
            .department_facts
            .insert((date, department, status), count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(n: i64) -> Count {
        Count::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_status_is_find_or_create() {
        let warehouse = MemoryWarehouse::new();

        let first = warehouse.resolve_status("Confirmados").await.unwrap();
        let second = warehouse.resolve_status("Confirmados").await.unwrap();
        let other = warehouse.resolve_status("Decesos").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(warehouse.status_count(), 2);
    }

    #[tokio::test]
    async fn test_resolve_date_and_department_are_stable() {
        let warehouse = MemoryWarehouse::new();
        let day = NaiveDate::from_ymd_opt(2021, 4, 1).unwrap();

        let d1 = warehouse.resolve_date(day).await.unwrap();
        let d2 = warehouse.resolve_date(day).await.unwrap();
        let p1 = warehouse.resolve_department("La Paz").await.unwrap();
        let p2 = warehouse.resolve_department("La Paz").await.unwrap();

        assert_eq!(d1, d2);
        assert_eq!(p1, p2);
        assert_eq!(warehouse.date_count(), 1);
        assert_eq!(warehouse.department_count(), 1);
    }

    #[tokio::test]
    async fn test_upsert_overall_fact_last_write_wins() {
        let warehouse = MemoryWarehouse::new();
        let date = warehouse
            .resolve_date(NaiveDate::from_ymd_opt(2021, 4, 1).unwrap())
            .await
            .unwrap();
        let status = warehouse.resolve_status("Confirmados").await.unwrap();

        warehouse.upsert_overall_fact(date, status, count(100)).await.unwrap();
        warehouse.upsert_overall_fact(date, status, count(120)).await.unwrap();

        assert_eq!(warehouse.overall_fact_count(), 1);
        assert_eq!(warehouse.overall_fact(date, status), Some(count(120)));
    }

    #[tokio::test]
    async fn test_upsert_department_fact_last_write_wins() {
        let warehouse = MemoryWarehouse::new();
        let date = warehouse
            .resolve_date(NaiveDate::from_ymd_opt(2021, 4, 1).unwrap())
            .await
            .unwrap();
        let dept = warehouse.resolve_department("Beni").await.unwrap();
        let status = warehouse.resolve_status("Decesos").await.unwrap();

        warehouse
            .upsert_department_fact(date, dept, status, count(3))
            .await
            .unwrap();
        warehouse
            .upsert_department_fact(date, dept, status, count(4))
            .await
            .unwrap();

        assert_eq!(warehouse.department_fact_count(), 1);
        assert_eq!(warehouse.department_fact(date, dept, status), Some(count(4)));
    }

    #[tokio::test]
    async fn test_upsert_rejects_unknown_keys() {
        let warehouse = MemoryWarehouse::new();
        let status = warehouse.resolve_status("Confirmados").await.unwrap();

        let err = warehouse
            .upsert_overall_fact(DateKey(42), status, count(1))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(warehouse.overall_fact_count(), 0);

        let date = warehouse
            .resolve_date(NaiveDate::from_ymd_opt(2021, 4, 1).unwrap())
            .await
            .unwrap();
        let err = warehouse
            .upsert_department_fact(date, DepartmentKey(7), status, count(1))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(warehouse.department_fact_count(), 0);
    }
}
