//! Backend adapters: dialect selection and dial-string construction.
//!
//! [`SqlBackend`] picks the `sea_query` builder for a dialect and renders
//! composed statements with it; executor implementations call it instead of
//! naming a builder directly. [`DbAdapter`] pairs a backend with the
//! credentials needed to reach it and produces the driver dial string.

mod mysql;
mod postgres;
mod sqlite;

#[doc(inline)]
pub use mysql::MySqlAdapter;
#[doc(inline)]
pub use postgres::PostgresAdapter;
#[doc(inline)]
pub use sqlite::SqliteAdapter;

use sea_query::{
    DeleteStatement, IndexCreateStatement, IndexDropStatement, InsertStatement, MysqlQueryBuilder,
    PostgresQueryBuilder, SelectStatement, SqliteQueryBuilder, TableAlterStatement,
    TableCreateStatement, TableDropStatement, UpdateStatement, Values,
};

/// SQL dialect of a database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlBackend {
    MySql,
    Postgres,
    Sqlite,
}

impl SqlBackend {
    /// Render a select statement with this backend's placeholder style.
    pub fn build_select(&self, stmt: &SelectStatement) -> (String, Values) {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render an insert statement.
    pub fn build_insert(&self, stmt: &InsertStatement) -> (String, Values) {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render an update statement.
    pub fn build_update(&self, stmt: &UpdateStatement) -> (String, Values) {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render a delete statement.
    pub fn build_delete(&self, stmt: &DeleteStatement) -> (String, Values) {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render a CREATE TABLE statement. DDL carries no parameters.
    pub fn build_create_table(&self, stmt: &TableCreateStatement) -> String {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render a DROP TABLE statement.
    pub fn build_drop_table(&self, stmt: &TableDropStatement) -> String {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render an ALTER TABLE statement.
    pub fn build_alter_table(&self, stmt: &TableAlterStatement) -> String {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render a CREATE INDEX statement.
    pub fn build_create_index(&self, stmt: &IndexCreateStatement) -> String {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }

    /// Render a DROP INDEX statement.
    pub fn build_drop_index(&self, stmt: &IndexDropStatement) -> String {
        match self {
            SqlBackend::MySql => stmt.build(MysqlQueryBuilder),
            SqlBackend::Postgres => stmt.build(PostgresQueryBuilder),
            SqlBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        }
    }
}

/// A configured database backend: dialect plus dial string.
///
/// Adapters only describe how to reach a database. Opening connections is
/// the driver's business; see [`crate::connection::connect`] for the
/// provided Postgres path.
pub trait DbAdapter {
    /// Dialect this adapter speaks.
    fn backend(&self) -> SqlBackend;

    /// Dial string for the driver, built from the configured credentials
    /// unless an explicit override was supplied.
    fn dsn(&self) -> String;
}
