//! PostgreSQL adapter.

use crate::adapter::{DbAdapter, SqlBackend};
use crate::config::DbConfig;

/// PostgreSQL backend adapter.
///
/// Builds a key/value dial string compatible with libpq-style drivers,
/// including [`crate::connection::connect`].
#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    config: DbConfig,
    dsn: Option<String>,
}

impl PostgresAdapter {
    pub fn new(config: DbConfig) -> Self {
        Self { config, dsn: None }
    }

    /// Override the computed dial string entirely.
    #[must_use]
    pub fn with_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = Some(dsn.into());
        self
    }
}

impl DbAdapter for PostgresAdapter {
    fn backend(&self) -> SqlBackend {
        SqlBackend::Postgres
    }

    fn dsn(&self) -> String {
        self.dsn.clone().unwrap_or_else(|| {
            format!(
                "host={} user={} password={} dbname={} port={} sslmode=disable",
                self.config.host,
                self.config.user,
                self.config.password,
                self.config.name,
                self.config.port
            )
        })
    }
}
