//! Provided PostgreSQL executor over `may_postgres`.
//!
//! [`PostgresExecutor`] implements both executor seams: [`SqlExecutor`] by
//! delegating to the client, and [`QueryExecutor`] for any record type that
//! is a [`Model`] with [`ToRow`]/[`FromRow`] conversions. Statements are
//! rendered with the Postgres dialect; parameters go through the typed
//! conversion in [`params`].

pub mod params;

use may_postgres::types::ToSql;
use may_postgres::{Client, Row};
use sea_query::{Expr, ExprTrait, PostgresQueryBuilder, Query, SelectStatement, Value};

use crate::error::DbError;
use crate::executor::{QueryExecutor, SqlExecutor};
use crate::postgres::params::with_converted_params;
use crate::schema::{Model, ToRow};

/// Row decoding for the provided executor.
///
/// Generated by `#[derive(FromRow)]`; maps one `may_postgres` row to the
/// record type by column name.
pub trait FromRow {
    /// Decode a database row.
    ///
    /// # Errors
    ///
    /// Returns the driver error when a column is missing or fails to decode.
    fn from_row(row: &Row) -> Result<Self, may_postgres::Error>
    where
        Self: Sized;
}

/// Check if an error represents a "no rows found" condition.
///
/// Matches the driver's specific wording so legitimate errors like "table
/// not found" or "column not found" never classify as an absent row.
pub(crate) fn is_no_rows_error(error: &DbError) -> bool {
    let message = match error {
        DbError::Driver(e) => e.to_string(),
        DbError::Query(s) | DbError::Other(s) => s.clone(),
        DbError::NotFound => return true,
        _ => return false,
    };
    let message = message.to_lowercase();
    message.contains("no rows")
        || message.contains("no row")
        || message.contains("row not found")
        || message.contains("expected one row")
        || message.contains("unexpected number of rows")
}

/// Rewrite a select into a COUNT(*) over the same conditions.
///
/// ORDER BY/LIMIT/OFFSET always render in that order at the end of the
/// statement, so everything from the first of those tokens onward is
/// dropped before wrapping. Databases apply LIMIT/OFFSET inside subqueries,
/// which is why they cannot simply be wrapped along.
pub(crate) fn count_statement_sql(sql: &str) -> String {
    let sql = sql.trim();
    let sql_upper = sql.to_uppercase();

    let order_by_pos = sql_upper.rfind(" ORDER BY ");
    let limit_pos = sql_upper.rfind(" LIMIT ");
    let offset_pos = sql_upper.rfind(" OFFSET ");

    let first_trailing_clause = order_by_pos
        .into_iter()
        .chain(limit_pos)
        .chain(offset_pos)
        .min();

    let cleaned = match first_trailing_clause {
        Some(pos) => sql[..pos].trim(),
        None => sql,
    };

    format!("SELECT COUNT(*) FROM ({cleaned}) AS count_subquery")
}

/// Zero integral values mark an unset auto-increment key.
fn is_zero_integer(value: &Value) -> bool {
    matches!(
        value,
        Value::TinyInt(Some(0))
            | Value::SmallInt(Some(0))
            | Value::Int(Some(0))
            | Value::BigInt(Some(0))
            | Value::TinyUnsigned(Some(0))
            | Value::SmallUnsigned(Some(0))
            | Value::Unsigned(Some(0))
            | Value::BigUnsigned(Some(0))
    )
}

/// Executor backed by a `may_postgres::Client`.
pub struct PostgresExecutor {
    client: Client,
}

impl PostgresExecutor {
    /// Create a new executor from a `may_postgres::Client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Consume the executor and return the underlying client.
    pub fn into_client(self) -> Client {
        self.client
    }
}

impl SqlExecutor for PostgresExecutor {
    fn execute(&self, query: &str, params: &[&dyn ToSql]) -> Result<u64, DbError> {
        self.client.execute(query, params).map_err(DbError::from)
    }

    fn query_one(&self, query: &str, params: &[&dyn ToSql]) -> Result<Row, DbError> {
        self.client.query_one(query, params).map_err(DbError::from)
    }

    fn query_all(&self, query: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, DbError> {
        self.client.query(query, params).map_err(DbError::from)
    }
}

impl<T> QueryExecutor<T> for PostgresExecutor
where
    T: Model + ToRow + FromRow,
{
    fn count(&self, query: &SelectStatement) -> Result<i64, DbError> {
        let (sql, values) = query.build(PostgresQueryBuilder);
        let count_sql = count_statement_sql(&sql);

        with_converted_params(&values, |params| {
            let row = SqlExecutor::query_one(self, &count_sql, params)?;
            let count: i64 = row
                .try_get(0)
                .map_err(|e| DbError::Parse(format!("Failed to read count: {e}")))?;
            if count < 0 {
                return Err(DbError::Other(format!("Count cannot be negative: {count}")));
            }
            Ok(count)
        })
    }

    fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<T>, DbError> {
        let (sql, values) = query.build(PostgresQueryBuilder);

        with_converted_params(&values, |params| {
            let rows = SqlExecutor::query_all(self, &sql, params)?;

            let mut results = Vec::with_capacity(rows.len());
            for row in rows {
                let record = T::from_row(&row)
                    .map_err(|e| DbError::Parse(format!("Failed to parse row: {e}")))?;
                results.push(record);
            }
            Ok(results)
        })
    }

    fn fetch_first(&self, query: &SelectStatement) -> Result<T, DbError> {
        let (sql, values) = query.build(PostgresQueryBuilder);

        let result = with_converted_params(&values, |params| {
            let row = SqlExecutor::query_one(self, &sql, params)?;
            T::from_row(&row).map_err(|e| DbError::Parse(format!("Failed to parse row: {e}")))
        });

        match result {
            Err(ref e) if is_no_rows_error(e) => Err(DbError::NotFound),
            other => other,
        }
    }

    fn create(&self, record: &T) -> Result<(), DbError> {
        let mut columns: Vec<String> = Vec::new();
        let mut exprs: Vec<Expr> = Vec::new();
        for (column, value) in record.to_row() {
            // Unset auto-increment keys are left to the database.
            if column == T::primary_key() && is_zero_integer(&value) {
                continue;
            }
            columns.push(column);
            exprs.push(Expr::val(value));
        }

        let mut insert = Query::insert();
        insert.into_table(T::table_name());
        insert
            .columns(columns)
            .values(exprs)
            .map_err(|e| DbError::Query(e.to_string()))?;

        let (sql, values) = insert.build(PostgresQueryBuilder);
        with_converted_params(&values, |params| {
            SqlExecutor::execute(self, &sql, params)?;
            Ok(())
        })
    }

    fn update(&self, id: u32, record: &T) -> Result<(), DbError> {
        let mut update = Query::update();
        update.table(T::table_name());
        for (column, value) in record.to_row() {
            if column == T::primary_key() {
                continue;
            }
            update.value(column, Expr::val(value));
        }
        update.and_where(Expr::col(T::primary_key()).eq(id));

        let (sql, values) = update.build(PostgresQueryBuilder);
        with_converted_params(&values, |params| {
            let affected = SqlExecutor::execute(self, &sql, params)?;
            if affected == 0 {
                return Err(DbError::NotFound);
            }
            Ok(())
        })
    }

    fn delete(&self, id: u32) -> Result<(), DbError> {
        let mut delete = Query::delete();
        delete
            .from_table(T::table_name())
            .and_where(Expr::col(T::primary_key()).eq(id));

        let (sql, values) = delete.build(PostgresQueryBuilder);
        with_converted_params(&values, |params| {
            let affected = SqlExecutor::execute(self, &sql, params)?;
            if affected == 0 {
                return Err(DbError::NotFound);
            }
            Ok(())
        })
    }
}
