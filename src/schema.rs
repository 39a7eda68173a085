//! Schema introspection: logical record types resolved to physical tables.
//!
//! The repository and filter layers never touch struct fields directly. They
//! go through [`Model::resolve`], which produces a [`TableSchema`]: the
//! physical table name plus the logical-name → column mapping for every
//! persisted field. `#[derive(Model)]` generates the trait from struct
//! metadata; hand-written implementations can resolve dynamically (and
//! fallibly) instead.

use std::fmt;

use sea_query::Value;

/// Logical column type of a persisted field.
///
/// Drives entity-derived DDL in the migration layer. The filter path carries
/// it along but does not interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    Bytes,
    DateTime,
    Date,
    Uuid,
    Json,
    Decimal,
}

/// One persisted field: logical name, physical column, and column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Logical field name as declared on the record type
    pub name: String,
    /// Physical column name
    pub column: String,
    /// Logical column type
    pub kind: FieldKind,
    /// Whether the column accepts NULL
    pub nullable: bool,
}

impl FieldDef {
    /// Create a non-nullable field definition.
    pub fn new(name: impl Into<String>, column: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            kind,
            nullable: false,
        }
    }

    /// Mark the field as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Resolved physical schema for a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Physical table name
    pub table: String,
    /// Persisted fields in declaration order
    pub fields: Vec<FieldDef>,
}

impl TableSchema {
    /// Create a schema from a table name and its field list.
    pub fn new(table: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            table: table.into(),
            fields,
        }
    }

    /// Look up a field by exact logical name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Schema resolution error.
///
/// Raised by dynamic [`Model::resolve`] implementations when a record type
/// cannot be mapped to a table. The query composer swallows it: a filter call
/// that cannot resolve its schema leaves the query untouched.
#[derive(Debug)]
pub enum SchemaError {
    /// The record type could not be resolved to a table
    Unresolvable(String),
    /// Field metadata was malformed or contradictory
    InvalidField(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Unresolvable(s) => {
                write!(f, "Schema resolution failed: {s}")
            }
            SchemaError::InvalidField(s) => {
                write!(f, "Invalid field definition: {s}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A record type mapped to a database table.
///
/// Usually generated with `#[derive(Model)]`:
///
/// ```ignore
/// use berth::Model;
///
/// #[derive(Model)]
/// #[table_name = "users"]
/// struct User {
///     #[primary_key]
///     id: u32,
///     name: String,
///     created_at: chrono::NaiveDateTime,
/// }
///
/// assert_eq!(User::table_name(), "users");
/// ```
pub trait Model {
    /// Physical table name for this record type.
    fn table_name() -> &'static str;

    /// Persisted fields in declaration order.
    fn fields() -> Vec<FieldDef>;

    /// Primary key column name.
    fn primary_key() -> &'static str {
        "id"
    }

    /// Resolve the record type to its physical schema.
    ///
    /// The default implementation composes [`Model::table_name`] and
    /// [`Model::fields`] and cannot fail. Dynamic introspectors override
    /// this and may return [`SchemaError`].
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the record type cannot be mapped to a table.
    fn resolve() -> Result<TableSchema, SchemaError> {
        Ok(TableSchema::new(Self::table_name(), Self::fields()))
    }
}

/// Conversion of a record into column values for insert/update statements.
///
/// Generated by `#[derive(Model)]`. Pairs are `(physical column, value)` in
/// declaration order, including the primary key.
pub trait ToRow {
    /// Column values of this record.
    fn to_row(&self) -> Vec<(String, Value)>;
}
