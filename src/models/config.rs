//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{PageLocale, PageSelectors};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and target page settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Warehouse connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Language of the dashboard's dates and numbers
    #[serde(default)]
    pub locale: PageLocale,

    /// CSS selectors locating the date fragment and the stats tables
    #[serde(default)]
    pub selectors: PageSelectors,

    /// How department table columns map onto statuses
    #[serde(default)]
    pub departments: DepartmentColumns,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults.", path);
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Apply `DB_*` and `WEBSITE_URL` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.database.port = port
                .trim()
                .parse()
                .map_err(|e| AppError::config(format!("DB_PORT '{port}' is invalid: {e}")))?;
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PWD") {
            self.database.password = password;
        }
        if let Some(dbname) = lookup("DB_DATABASE") {
            self.database.dbname = dbname;
        }
        if let Some(url) = lookup("WEBSITE_URL") {
            self.crawler.website_url = url;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.crawler.website_url)?;
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.database.host.trim().is_empty() {
            return Err(AppError::validation("database.host is empty"));
        }
        if self.database.port == 0 {
            return Err(AppError::validation("database.port must be > 0"));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(AppError::validation(
                "database.connect_timeout_secs must be > 0",
            ));
        }
        self.locale.validate()?;
        self.departments.validate()?;
        Ok(())
    }
}

/// HTTP client and target page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Dashboard page to scrape
    #[serde(default = "defaults::website_url")]
    pub website_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            website_url: defaults::website_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "defaults::db_host")]
    pub host: String,

    #[serde(default = "defaults::db_port")]
    pub port: u16,

    #[serde(default = "defaults::db_user")]
    pub user: String,

    /// Empty means no password is sent
    #[serde(default)]
    pub password: String,

    #[serde(default = "defaults::db_name")]
    pub dbname: String,

    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Create the warehouse tables on connect if they are missing
    #[serde(default = "defaults::create_schema")]
    pub create_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: defaults::db_host(),
            port: defaults::db_port(),
            user: defaults::db_user(),
            password: String::new(),
            dbname: defaults::db_name(),
            connect_timeout_secs: defaults::connect_timeout(),
            create_schema: defaults::create_schema(),
        }
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("dbname", &self.dbname)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("create_schema", &self.create_schema)
            .finish()
    }
}

/// Department table layout: which column names the department and which
/// columns carry status counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentColumns {
    /// Column holding the department name
    #[serde(default = "defaults::name_column")]
    pub name_column: String,

    /// Count columns and the status each one is stored under
    #[serde(default = "defaults::status_columns")]
    pub statuses: Vec<StatusColumn>,
}

impl DepartmentColumns {
    pub fn validate(&self) -> Result<()> {
        if self.name_column.trim().is_empty() {
            return Err(AppError::validation("departments.name_column is empty"));
        }
        if self.statuses.is_empty() {
            return Err(AppError::validation("departments.statuses is empty"));
        }
        if let Some(bad) = self
            .statuses
            .iter()
            .find(|s| s.column.trim().is_empty() || s.status.trim().is_empty())
        {
            return Err(AppError::validation(format!(
                "departments.statuses has an empty entry: {bad:?}"
            )));
        }
        Ok(())
    }
}

impl Default for DepartmentColumns {
    fn default() -> Self {
        Self {
            name_column: defaults::name_column(),
            statuses: defaults::status_columns(),
        }
    }
}

/// A department table column and the status name it is stored as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusColumn {
    pub column: String,
    pub status: String,
}

impl StatusColumn {
    pub fn new(column: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            status: status.into(),
        }
    }
}

mod defaults {
    use super::StatusColumn;

    // Crawler defaults
    pub fn website_url() -> String {
        "https://boliviasegura.gob.bo/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; covid-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Database defaults
    pub fn db_host() -> String {
        "localhost".into()
    }
    pub fn db_port() -> u16 {
        5432
    }
    pub fn db_user() -> String {
        "postgres".into()
    }
    pub fn db_name() -> String {
        "covid".into()
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn create_schema() -> bool {
        true
    }

    // Department table defaults
    pub fn name_column() -> String {
        "Departamento".into()
    }
    pub fn status_columns() -> Vec<StatusColumn> {
        vec![
            StatusColumn::new("Acumulado", "Confirmados"),
            StatusColumn::new("Decesos", "Decesos"),
            StatusColumn::new("Recuperados", "Recuperados"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = Config::default();
        config.crawler.website_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = Config::default();
        config.database.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_status_mapping() {
        let mut config = Config::default();
        config.departments.statuses.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_replace_defaults() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "6543"),
                ("DB_PWD", "secret"),
                ("WEBSITE_URL", "https://example.org/"),
            ]))
            .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.crawler.website_url, "https://example.org/");
    }

    #[test]
    fn env_override_rejects_bad_port() {
        let mut config = Config::default();
        let result = config.apply_overrides(lookup(&[("DB_PORT", "fifty")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn debug_output_hides_password() {
        let mut db = DatabaseConfig::default();
        db.password = "hunter2".to_string();
        let rendered = format!("{db:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn load_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
host = "warehouse"

[departments]
name_column = "Depto"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database.host, "warehouse");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.departments.name_column, "Depto");
        assert_eq!(config.departments.statuses.len(), 3);
        assert_eq!(config.crawler.website_url, "https://boliviasegura.gob.bo/");
    }

    #[test]
    fn load_or_default_survives_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load_or_default(dir.path().join("nope.toml"));
        assert_eq!(missing.database.dbname, "covid");

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[database\nhost = ").unwrap();
        let config = Config::load_or_default(&broken);
        assert_eq!(config.database.host, "localhost");
    }
}
