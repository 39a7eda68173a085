//! Migration trait definition

use std::marker::PhantomData;

use super::schema_manager::SchemaManager;
use crate::error::DbError;
use crate::schema::Model;

/// Trait that all migrations must implement
///
/// Each migration defines a struct with an `up()` to apply the change and a
/// `down()` to undo it. The identifier is recorded in the state table, so it
/// must stay stable once a migration has shipped.
pub trait Migration: Send + Sync {
    /// Stable identifier recorded in the state table.
    fn id(&self) -> &str;

    /// Apply the migration.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if a schema operation fails.
    fn up(&self, manager: &SchemaManager<'_>) -> Result<(), DbError>;

    /// Undo the migration.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if a schema operation fails.
    fn down(&self, manager: &SchemaManager<'_>) -> Result<(), DbError>;
}

/// Migration that creates and drops the table for a [`Model`].
///
/// `up` creates the model's table from its field definitions; `down` drops
/// it. The identifier is `create_<table>`.
///
/// # Example
///
/// ```ignore
/// let mut migrator = Migrator::new(SqlBackend::Postgres);
/// migrator.add(ModelMigration::<User>::new());
/// migrator.run(&executor)?;
/// ```
pub struct ModelMigration<T> {
    id: String,
    _model: PhantomData<fn() -> T>,
}

impl<T: Model> ModelMigration<T> {
    /// Create the migration for `T`'s table.
    pub fn new() -> Self {
        Self {
            id: format!("create_{}", T::table_name()),
            _model: PhantomData,
        }
    }
}

impl<T: Model> Default for ModelMigration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> Migration for ModelMigration<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn up(&self, manager: &SchemaManager<'_>) -> Result<(), DbError> {
        manager.create_table_from_model::<T>()
    }

    fn down(&self, manager: &SchemaManager<'_>) -> Result<(), DbError> {
        manager.drop_table_for_model::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, FieldKind};

    struct Account;

    impl Model for Account {
        fn table_name() -> &'static str {
            "accounts"
        }

        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::new("id", "id", FieldKind::BigInt)]
        }
    }

    #[test]
    fn test_model_migration_id_derives_from_table() {
        let migration = ModelMigration::<Account>::new();
        assert_eq!(migration.id(), "create_accounts");
    }
}
