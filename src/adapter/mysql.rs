//! MySQL adapter.

use crate::adapter::{DbAdapter, SqlBackend};
use crate::config::DbConfig;

/// MySQL backend adapter.
///
/// Builds the classic `user:pass@tcp(host:port)/name` dial string with the
/// charset/time options most MySQL drivers expect.
#[derive(Debug, Clone)]
pub struct MySqlAdapter {
    config: DbConfig,
    dsn: Option<String>,
}

impl MySqlAdapter {
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

impl DbAdapter for MySqlAdapter {
    fn backend(&self) -> SqlBackend {
        SqlBackend::MySql
    }

    fn dsn(&self) -> String {
        self.dsn.clone().unwrap_or_else(|| {
            format!(
                "{}:{}@tcp({}:{})/{}?charset=utf8mb4&parseTime=True&loc=Local",
                self.config.user,
                self.config.password,
                self.config.host,
                self.config.port,
                self.config.name
            )
        })
    }
}
