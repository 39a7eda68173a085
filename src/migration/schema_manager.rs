//! SchemaManager - schema operations for migrations

use sea_query::{
    ColumnDef, IndexCreateStatement, IndexDropStatement, Table, TableAlterStatement,
    TableCreateStatement, TableDropStatement,
};

use crate::adapter::SqlBackend;
use crate::error::DbError;
use crate::executor::SqlExecutor;
use crate::schema::{FieldDef, FieldKind, Model};

/// Column definition for a model field, following the field's kind,
/// nullability and primary-key status.
fn column_def_for(field: &FieldDef, primary_key: &str) -> ColumnDef {
    let mut column = ColumnDef::new(field.column.clone());
    match field.kind {
        FieldKind::Bool => column.boolean(),
        FieldKind::SmallInt => column.small_integer(),
        FieldKind::Int => column.integer(),
        FieldKind::BigInt => column.big_integer(),
        FieldKind::Float => column.float(),
        FieldKind::Double => column.double(),
        FieldKind::Text => column.string(),
        FieldKind::Bytes => column.binary(),
        FieldKind::DateTime => column.timestamp(),
        FieldKind::Date => column.date(),
        FieldKind::Uuid => column.uuid(),
        FieldKind::Json => column.json_binary(),
        FieldKind::Decimal => column.decimal(),
    };

    if field.column == primary_key {
        column.not_null().primary_key();
        if matches!(
            field.kind,
            FieldKind::SmallInt | FieldKind::Int | FieldKind::BigInt
        ) {
            column.auto_increment();
        }
    } else if field.nullable {
        column.null();
    } else {
        column.not_null();
    }

    column
}

/// SchemaManager provides methods for performing schema operations in
/// migrations.
///
/// It borrows an executor for the duration of a migration run and renders
/// DDL with the dialect of the configured backend.
pub struct SchemaManager<'a> {
    executor: &'a dyn SqlExecutor,
    backend: SqlBackend,
}

impl<'a> SchemaManager<'a> {
    /// Create a new SchemaManager over the given executor and dialect.
    pub fn new(executor: &'a dyn SqlExecutor, backend: SqlBackend) -> Self {
        Self { executor, backend }
    }

    /// Create a table
    ///
    /// # Example
    /// ```rust,no_run
    /// use sea_query::{Table, ColumnDef};
    ///
    /// # fn demo(manager: &berth::SchemaManager<'_>) -> Result<(), berth::DbError> {
    /// let table = Table::create()
    ///     .table("users")
    ///     .col(ColumnDef::new("id").big_integer().not_null().auto_increment().primary_key())
    ///     .col(ColumnDef::new("email").string().not_null())
    ///     .to_owned();
    ///
    /// manager.create_table(table)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn create_table(&self, table: TableCreateStatement) -> Result<(), DbError> {
        let sql = self.backend.build_create_table(&table);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Drop a table
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn drop_table(&self, table: TableDropStatement) -> Result<(), DbError> {
        let sql = self.backend.build_drop_table(&table);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Alter a table
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn alter_table(&self, alter: TableAlterStatement) -> Result<(), DbError> {
        let sql = self.backend.build_alter_table(&alter);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Create an index
    ///
    /// # Example
    /// ```rust,no_run
    /// use sea_query::Index;
    ///
    /// # fn demo(manager: &berth::SchemaManager<'_>) -> Result<(), berth::DbError> {
    /// let index = Index::create()
    ///     .name("idx_users_email")
    ///     .table("users")
    ///     .col("email")
    ///     .to_owned();
    ///
    /// manager.create_index(index)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn create_index(&self, index: IndexCreateStatement) -> Result<(), DbError> {
        let sql = self.backend.build_create_index(&index);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Drop an index
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn drop_index(&self, index: IndexDropStatement) -> Result<(), DbError> {
        let sql = self.backend.build_drop_index(&index);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Add a column to an existing table
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn add_column(&self, table: &str, column: ColumnDef) -> Result<(), DbError> {
        let mut column = column;
        let alter = Table::alter()
            .table(table.to_string())
            .add_column(&mut column)
            .to_owned();
        self.alter_table(alter)
    }

    /// Drop a column from an existing table
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn drop_column(&self, table: &str, column: &str) -> Result<(), DbError> {
        let alter = Table::alter()
            .table(table.to_string())
            .drop_column(column.to_string())
            .to_owned();
        self.alter_table(alter)
    }

    /// Rename a column of an existing table
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<(), DbError> {
        let alter = Table::alter()
            .table(table.to_string())
            .rename_column(old_name.to_string(), new_name.to_string())
            .to_owned();
        self.alter_table(alter)
    }

    /// Execute raw SQL
    ///
    /// # Example
    /// ```rust,no_run
    /// # fn demo(manager: &berth::SchemaManager<'_>) -> Result<(), berth::DbError> {
    /// manager.execute("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"", &[])?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn execute(
        &self,
        sql: &str,
        params: &[&dyn may_postgres::types::ToSql],
    ) -> Result<(), DbError> {
        self.executor.execute(sql, params).map(|_| ())
    }

    /// The underlying executor.
    pub fn executor(&self) -> &dyn SqlExecutor {
        self.executor
    }

    /// The dialect DDL is rendered with.
    pub fn backend(&self) -> SqlBackend {
        self.backend
    }

    /// Create the table for a model from its field definitions.
    ///
    /// Integral primary keys become auto-increment columns. The statement
    /// carries `IF NOT EXISTS`, so re-running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn create_table_from_model<T: Model>(&self) -> Result<(), DbError> {
        let mut table = Table::create();
        table.table(T::table_name()).if_not_exists();
        for field in T::fields() {
            let mut column = column_def_for(&field, T::primary_key());
            table.col(&mut column);
        }
        self.create_table(table.to_owned())
    }

    /// Drop the table for a model.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if execution fails.
    pub fn drop_table_for_model<T: Model>(&self) -> Result<(), DbError> {
        let table = Table::drop().table(T::table_name()).if_exists().to_owned();
        self.drop_table(table)
    }
}
