// src/pipeline/load.rs

//! Writing an extracted snapshot into the warehouse.

use crate::error::{AppError, Result};
use crate::models::{Config, Count, DashboardSnapshot, DateKey, DepartmentRecord};
use crate::storage::Warehouse;

/// What one run wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub date_key: DateKey,
    pub overall_facts: usize,
    pub departments: usize,
    pub department_facts: usize,
}

/// Resolve dimensions and upsert every fact in `snapshot`.
///
/// Rows are committed one statement at a time. If this fails halfway, the
/// rows already written stay; running again with the same page converges.
pub async fn store_snapshot(
    config: &Config,
    snapshot: &DashboardSnapshot,
    warehouse: &dyn Warehouse,
) -> Result<RunSummary> {
    let separator = config.locale.thousands_separator;

    let date_key = warehouse.resolve_date(snapshot.report_date).await?;
    log::debug!("Date '{}' has the SK '{}'", snapshot.report_date, date_key);

    log::info!("Storing overall stats ...");
    let mut overall_facts = 0;
    for (status, raw) in snapshot.overall.iter() {
        let count = Count::parse(raw, separator)?;
        let status_key = warehouse.resolve_status(status).await?;
        log::debug!("Status '{status}' has the SK '{status_key}'");
        warehouse
            .upsert_overall_fact(date_key, status_key, count)
            .await?;
        overall_facts += 1;
    }
    log::info!("Storing overall stats ... done! ({overall_facts} facts)");

    log::info!("Storing department stats ...");
    let columns = &config.departments;
    let mut department_facts = 0;
    for record in &snapshot.departments {
        let name = cell(record, &columns.name_column)?;
        let department_key = warehouse.resolve_department(name).await?;
        log::debug!("Department '{name}' has the SK '{department_key}'");

        for mapping in &columns.statuses {
            let count = Count::parse(cell(record, &mapping.column)?, separator)?;
            let status_key = warehouse.resolve_status(&mapping.status).await?;
            warehouse
                .upsert_department_fact(date_key, department_key, status_key, count)
                .await?;
            department_facts += 1;
        }
    }
    log::info!("Storing department stats ... done! ({department_facts} facts)");

    Ok(RunSummary {
        date_key,
        overall_facts,
        departments: snapshot.departments.len(),
        department_facts,
    })
}

fn cell<'a>(record: &'a DepartmentRecord, column: &str) -> Result<&'a str> {
    record.get(column).ok_or_else(|| {
        AppError::parse(
            "department_stats",
            format!("column '{column}' missing from department row"),
        )
    })
}
