//! Warehouse DDL and statements.

/// Statements creating the star schema, run in order.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS date_dim (
        date_sk   SERIAL PRIMARY KEY,
        date_date DATE NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS status_dim (
        status_sk   SERIAL PRIMARY KEY,
        status_name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS department_dim (
        department_sk   SERIAL PRIMARY KEY,
        department_name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS overall_facts (
        date_sk   INTEGER NOT NULL REFERENCES date_dim (date_sk),
        status_sk INTEGER NOT NULL REFERENCES status_dim (status_sk),
        count     BIGINT  NOT NULL CHECK (count >= 0),
        UNIQUE (date_sk, status_sk)
    )",
    "CREATE TABLE IF NOT EXISTS department_facts (
        date_sk       INTEGER NOT NULL REFERENCES date_dim (date_sk),
        department_sk INTEGER NOT NULL REFERENCES department_dim (department_sk),
        status_sk     INTEGER NOT NULL REFERENCES status_dim (status_sk),
        count         BIGINT  NOT NULL CHECK (count >= 0),
        UNIQUE (date_sk, department_sk, status_sk)
    )",
];

// Find-or-create: look the natural key up first and insert only when it is
// missing, so resolving an existing key does not draw from the SERIAL
// sequence. One statement, so one transaction. A concurrent insert of the
// same key can still leave both branches empty (and burn one value); the
// caller retries.

pub const RESOLVE_DATE: &str = "
    WITH existing AS (
        SELECT date_sk FROM date_dim WHERE date_date = $1::date
    ), inserted AS (
        INSERT INTO date_dim (date_date)
        SELECT $1::date WHERE NOT EXISTS (SELECT 1 FROM existing)
        ON CONFLICT (date_date) DO NOTHING
        RETURNING date_sk
    )
    SELECT date_sk FROM existing
    UNION ALL
    SELECT date_sk FROM inserted
    LIMIT 1";

pub const RESOLVE_STATUS: &str = "
    WITH existing AS (
        SELECT status_sk FROM status_dim WHERE status_name = $1::text
    ), inserted AS (
        INSERT INTO status_dim (status_name)
        SELECT $1::text WHERE NOT EXISTS (SELECT 1 FROM existing)
        ON CONFLICT (status_name) DO NOTHING
        RETURNING status_sk
    )
    SELECT status_sk FROM existing
    UNION ALL
    SELECT status_sk FROM inserted
    LIMIT 1";

pub const RESOLVE_DEPARTMENT: &str = "
    WITH existing AS (
        SELECT department_sk FROM department_dim WHERE department_name = $1::text
    ), inserted AS (
        INSERT INTO department_dim (department_name)
        SELECT $1::text WHERE NOT EXISTS (SELECT 1 FROM existing)
        ON CONFLICT (department_name) DO NOTHING
        RETURNING department_sk
    )
    SELECT department_sk FROM existing
    UNION ALL
    SELECT department_sk FROM inserted
    LIMIT 1";

pub const UPSERT_OVERALL_FACT: &str = "
    INSERT INTO overall_facts (date_sk, status_sk, count)
    VALUES ($1, $2, $3)
    ON CONFLICT (date_sk, status_sk) DO UPDATE SET count = EXCLUDED.count";

pub const UPSERT_DEPARTMENT_FACT: &str = "
    INSERT INTO department_facts (date_sk, department_sk, status_sk, count)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (date_sk, department_sk, status_sk) DO UPDATE SET count = EXCLUDED.count";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_parameterized() {
        for sql in [
            RESOLVE_DATE,
            RESOLVE_STATUS,
            RESOLVE_DEPARTMENT,
            UPSERT_OVERALL_FACT,
            UPSERT_DEPARTMENT_FACT,
        ] {
            assert!(sql.contains("$1"));
            assert!(!sql.contains('\''), "literal value in {sql}");
        }
    }

    #[test]
    fn resolve_inserts_only_missing_keys() {
        for (sql, table) in [
            (RESOLVE_DATE, "date_dim"),
            (RESOLVE_STATUS, "status_dim"),
            (RESOLVE_DEPARTMENT, "department_dim"),
        ] {
            let lookup = sql.find(&format!("FROM {table} WHERE")).unwrap();
            let insert = sql.find(&format!("INSERT INTO {table}")).unwrap();
            assert!(lookup < insert, "lookup must precede insert in {sql}");
            assert!(sql.contains("WHERE NOT EXISTS (SELECT 1 FROM existing)"));
            assert!(sql.contains("ON CONFLICT"));
        }
    }

    #[test]
    fn schema_creates_every_table_idempotently() {
        let tables = ["date_dim", "status_dim", "department_dim", "overall_facts", "department_facts"];
        assert_eq!(SCHEMA.len(), tables.len());
        for (sql, table) in SCHEMA.iter().zip(tables) {
            assert!(sql.starts_with(&format!("CREATE TABLE IF NOT EXISTS {table} ")));
        }
    }
}
