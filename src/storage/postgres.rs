//! PostgreSQL warehouse implementation.
//!
//! Holds one client for the whole run. All statements are prepared once at
//! connect time and executed with bound parameters.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Statement};

use crate::error::{AppError, Result};
use crate::models::{Count, DatabaseConfig, DateKey, DepartmentKey, StatusKey};
use crate::storage::{Warehouse, schema};

/// Prepared statements for the warehouse operations.
struct Statements {
    resolve_date: Statement,
    resolve_status: Statement,
    resolve_department: Statement,
    upsert_overall_fact: Statement,
    upsert_department_fact: Statement,
}

impl Statements {
    async fn prepare(client: &Client) -> Result<Self> {
        Ok(Self {
            resolve_date: client.prepare(schema::RESOLVE_DATE).await?,
            resolve_status: client.prepare(schema::RESOLVE_STATUS).await?,
            resolve_department: client.prepare(schema::RESOLVE_DEPARTMENT).await?,
            upsert_overall_fact: client.prepare(schema::UPSERT_OVERALL_FACT).await?,
            upsert_department_fact: client.prepare(schema::UPSERT_DEPARTMENT_FACT).await?,
        })
    }
}

/// PostgreSQL warehouse backend.
///
/// The connection task is aborted when the warehouse is dropped, which closes
/// the socket.
pub struct PostgresWarehouse {
    client: Client,
    statements: Statements,
    connection: JoinHandle<()>,
}

impl PostgresWarehouse {
    /// Connect using the given settings, optionally creating the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .user(&config.user)
            .dbname(&config.dbname)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.password.is_empty() {
            pg.password(&config.password);
        }

        log::info!(
            "Connecting to warehouse {}@{}:{}/{}",
            config.user,
            config.host,
            config.port,
            config.dbname
        );
        let (client, connection) = pg.connect(NoTls).await?;
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("Warehouse connection error: {e}");
            }
        });

        if config.create_schema {
            for ddl in schema::SCHEMA {
                client.batch_execute(ddl).await?;
            }
            log::debug!("Warehouse schema ensured");
        }

        let statements = Statements::prepare(&client).await?;
        Ok(Self {
            client,
            statements,
            connection,
        })
    }

    /// Run a find-or-create statement and return the surrogate key.
    ///
    /// A concurrent writer can insert the row between our conflict check and
    /// our lookup, leaving both branches empty; the retry sees its commit.
    async fn resolve(
        &self,
        statement: &Statement,
        param: &(dyn ToSql + Sync),
        what: &str,
    ) -> Result<i32> {
        for _ in 0..2 {
            if let Some(row) = self.client.query_opt(statement, &[param]).await? {
                return Ok(row.try_get(0)?);
            }
        }
        Err(AppError::persistence(format!(
            "{what} row neither inserted nor found"
        )))
    }
}

impl Drop for PostgresWarehouse {
    fn drop(&mut self) {
        self.connection.abort();
    }
}

#[async_trait]
impl Warehouse for PostgresWarehouse {
    async fn resolve_date(&self, date: NaiveDate) -> Result<DateKey> {
        self.resolve(&self.statements.resolve_date, &date, "date_dim")
            .await
            .map(DateKey)
    }

    async fn resolve_status(&self, name: &str) -> Result<StatusKey> {
        self.resolve(&self.statements.resolve_status, &name, "status_dim")
            .await
            .map(StatusKey)
    }

    async fn resolve_department(&self, name: &str) -> Result<DepartmentKey> {
        self.resolve(&self.statements.resolve_department, &name, "department_dim")
            .await
            .map(DepartmentKey)
    }

    async fn upsert_overall_fact(
        &self,
        date: DateKey,
        status: StatusKey,
        count: Count,
    ) -> Result<()> {
        self.client
            .execute(
                &self.statements.upsert_overall_fact,
                &[&date.get(), &status.get(), &count.get()],
            )
            .await?;
        Ok(())
    }

    async fn upsert_department_fact(
        &self,
        date: DateKey,
        department: DepartmentKey,
        status: StatusKey,
        count: Count,
    ) -> Result<()> {
        self.client
            .execute(
                &self.statements.upsert_department_fact,
                &[&date.get(), &department.get(), &status.get(), &count.get()],
            )
            .await?;
        Ok(())
    }
}
