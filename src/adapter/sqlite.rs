//! SQLite adapter.

use crate::adapter::{DbAdapter, SqlBackend};
use crate::config::DbConfig;

/// SQLite backend adapter.
///
/// The dial string is just the database file path; the configured database
/// name is used verbatim.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    config: DbConfig,
    dsn: Option<String>,
}

impl SqliteAdapter {
    pub fn new(config: DbConfig) -> Self {
        Self { config, dsn: None }
    }

    /// Override the file path entirely.
    #[must_use]
    pub fn with_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = Some(dsn.into());
        self
    }
}

impl DbAdapter for SqliteAdapter {
    fn backend(&self) -> SqlBackend {
        SqlBackend::Sqlite
    }

    fn dsn(&self) -> String {
        self.dsn
            .clone()
            .unwrap_or_else(|| self.config.name.clone())
    }
}
