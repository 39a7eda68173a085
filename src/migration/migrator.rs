//! Migrator - migration execution engine

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_query::{ColumnDef, Expr, ExprTrait, Order, Query, Table};

use crate::adapter::SqlBackend;
use crate::error::DbError;
use crate::executor::SqlExecutor;
use crate::migration::error::MigrationError;
use crate::migration::migration::{Migration, ModelMigration};
use crate::migration::schema_manager::SchemaManager;
use crate::schema::Model;

/// Name of the state tracking table.
pub const STATE_TABLE: &str = "berth_migrations";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse a state-table timestamp.
///
/// Timestamps travel as strings; accept the formats the driver and the
/// databases are known to produce.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    let formats = [
        TIMESTAMP_FORMAT,
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in formats {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(DbError::Parse(format!(
        "Failed to parse timestamp '{value}': unrecognized format"
    )))
}

/// One entry of the state tracking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// Identifier of the applied migration
    pub id: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

impl MigrationRecord {
    /// Build a record from state-table values.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the timestamp does not parse.
    pub fn from_state(id: String, applied_at: &str) -> Result<Self, DbError> {
        Ok(Self {
            id,
            applied_at: parse_timestamp(applied_at)?,
        })
    }
}

/// Applied and pending migrations, as reported by [`Migrator::status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Records of applied migrations, oldest first
    pub applied: Vec<MigrationRecord>,
    /// Identifiers of registered migrations not yet applied, in
    /// registration order
    pub pending: Vec<String>,
}

/// Migration execution engine.
///
/// Migrations are registered in code and applied in registration order.
/// Applied identifiers are tracked in the [`STATE_TABLE`]; running twice
/// applies only what is new.
///
/// # Example
///
/// ```ignore
/// let mut migrator = Migrator::new(SqlBackend::Postgres);
/// migrator.add_model::<User>().add_model::<Order>();
/// let applied = migrator.run(&executor)?;
/// ```
pub struct Migrator {
    backend: SqlBackend,
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// Create a migrator rendering DDL and state statements for `backend`.
    pub fn new(backend: SqlBackend) -> Self {
        Self {
            backend,
            migrations: Vec::new(),
        }
    }

    /// Register a migration. Registration order is execution order.
    pub fn add(&mut self, migration: impl Migration + 'static) -> &mut Self {
        self.migrations.push(Box::new(migration));
        self
    }

    /// Register the table-creating migration for a model.
    pub fn add_model<T: Model + 'static>(&mut self) -> &mut Self {
        self.add(ModelMigration::<T>::new())
    }

    /// Apply every registered migration that is not yet recorded.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Empty`] if nothing is registered,
    /// [`MigrationError::Duplicate`] if two migrations share an identifier,
    /// [`MigrationError::ExecutionFailed`] if a migration's `up` fails, or
    /// a database error from state bookkeeping.
    pub fn run(&self, executor: &dyn SqlExecutor) -> Result<usize, MigrationError> {
        if self.migrations.is_empty() {
            return Err(MigrationError::Empty);
        }
        self.check_duplicates()?;
        self.initialize_state_table(executor)?;

        let applied: HashSet<String> = self
            .query_applied(executor)?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let manager = SchemaManager::new(executor, self.backend);
        let mut count = 0;
        for migration in &self.migrations {
            if applied.contains(migration.id()) {
                continue;
            }
            log::info!("Applying migration {}", migration.id());
            migration
                .up(&manager)
                .map_err(|e| MigrationError::ExecutionFailed {
                    id: migration.id().to_string(),
                    error: e.to_string(),
                })?;
            self.insert_record(executor, migration.id())?;
            count += 1;
        }

        if count == 0 {
            log::info!("No pending migrations");
        } else {
            log::info!("Applied {count} migrations");
        }
        Ok(count)
    }

    /// Roll back up to `steps` applied migrations, newest registration
    /// first.
    ///
    /// Rolling back with nothing applied is a no-op. Fewer applied
    /// migrations than `steps` rolls back what there is.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Unknown`] if an applied migration that
    /// would need rolling back is not registered,
    /// [`MigrationError::ExecutionFailed`] if a `down` fails, or a database
    /// error from state bookkeeping.
    pub fn rollback(
        &self,
        executor: &dyn SqlExecutor,
        steps: usize,
    ) -> Result<usize, MigrationError> {
        self.initialize_state_table(executor)?;

        let applied_records = self.query_applied(executor)?;
        if applied_records.is_empty() || steps == 0 {
            return Ok(0);
        }
        let applied: HashSet<&str> = applied_records.iter().map(|r| r.id.as_str()).collect();

        let manager = SchemaManager::new(executor, self.backend);
        let mut count = 0;
        for migration in self.migrations.iter().rev() {
            if count == steps {
                break;
            }
            if !applied.contains(migration.id()) {
                continue;
            }
            log::info!("Rolling back migration {}", migration.id());
            migration
                .down(&manager)
                .map_err(|e| MigrationError::ExecutionFailed {
                    id: migration.id().to_string(),
                    error: e.to_string(),
                })?;
            self.delete_record(executor, migration.id())?;
            count += 1;
        }

        if count < steps && count < applied_records.len() {
            let registered: HashSet<&str> =
                self.migrations.iter().map(|m| m.id()).collect();
            if let Some(record) = applied_records
                .iter()
                .find(|r| !registered.contains(r.id.as_str()))
            {
                return Err(MigrationError::Unknown(record.id.clone()));
            }
        }
        Ok(count)
    }

    /// Compare the registry with the state table.
    ///
    /// # Errors
    ///
    /// Returns a database error from reading the state table.
    pub fn status(&self, executor: &dyn SqlExecutor) -> Result<MigrationStatus, MigrationError> {
        self.initialize_state_table(executor)?;
        let applied = self.query_applied(executor)?;
        let applied_ids: HashSet<&str> = applied.iter().map(|r| r.id.as_str()).collect();
        let pending = self
            .migrations
            .iter()
            .map(|m| m.id())
            .filter(|id| !applied_ids.contains(id))
            .map(String::from)
            .collect();
        Ok(MigrationStatus { applied, pending })
    }

    fn check_duplicates(&self) -> Result<(), MigrationError> {
        let mut seen = HashSet::new();
        for migration in &self.migrations {
            if !seen.insert(migration.id()) {
                return Err(MigrationError::Duplicate(migration.id().to_string()));
            }
        }
        Ok(())
    }

    /// Create the state tracking table if it does not exist.
    fn initialize_state_table(&self, executor: &dyn SqlExecutor) -> Result<(), MigrationError> {
        let table = Table::create()
            .table(STATE_TABLE)
            .if_not_exists()
            .col(
                ColumnDef::new("id")
                    .string()
                    .string_len(255)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new("applied_at").timestamp().not_null())
            .to_owned();
        let sql = self.backend.build_create_table(&table);
        executor.execute(&sql, &[])?;
        Ok(())
    }

    /// Applied migrations, oldest first.
    fn query_applied(
        &self,
        executor: &dyn SqlExecutor,
    ) -> Result<Vec<MigrationRecord>, MigrationError> {
        let mut select = Query::select();
        select
            .columns(["id", "applied_at"])
            .from(STATE_TABLE)
            .order_by("applied_at", Order::Asc)
            .order_by("id", Order::Asc);
        let (sql, _) = self.backend.build_select(&select);

        let pairs = executor.query_text_pairs(&sql)?;
        let mut records = Vec::with_capacity(pairs.len());
        for (id, applied_at) in pairs {
            records.push(MigrationRecord::from_state(id, &applied_at)?);
        }
        Ok(records)
    }

    fn insert_record(&self, executor: &dyn SqlExecutor, id: &str) -> Result<(), MigrationError> {
        let applied_at = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        let mut insert = Query::insert();
        insert.into_table(STATE_TABLE).columns(["id", "applied_at"]);
        insert
            .values([Expr::val(id), Expr::val(applied_at.as_str())])
            .map_err(|e| MigrationError::Database(DbError::Query(e.to_string())))?;
        let (sql, _) = self.backend.build_insert(&insert);

        executor.execute(&sql, &[&id, &applied_at])?;
        Ok(())
    }

    fn delete_record(&self, executor: &dyn SqlExecutor, id: &str) -> Result<(), MigrationError> {
        let mut delete = Query::delete();
        delete
            .from_table(STATE_TABLE)
            .and_where(Expr::col("id").eq(id));
        let (sql, _) = self.backend.build_delete(&delete);

        executor.execute(&sql, &[&id])?;
        Ok(())
    }
}
