//! Procedural macros for berth
//!
//! This crate provides the `Model` and `FromRow` derive macros.

mod attributes;
mod macros;
mod utils;

use proc_macro::TokenStream;

/// Derive macro for `Model` - generates table metadata and column values
///
/// Generates the `berth::Model` implementation (table name, field
/// definitions, primary key) and the `berth::ToRow` implementation (column
/// values for inserts and updates).
///
/// Supported attributes:
/// - `#[table_name = "users"]` on the struct; defaults to the snake_cased
///   struct name with an `s` appended
/// - `#[column_name = "email_address"]` on a field; defaults to the
///   snake_cased field name
/// - `#[column_type = "json"]` on a field to override the inferred kind
/// - `#[primary_key]` on at most one field; defaults to the `id` column
///
/// Field types map to column kinds by name: integers, floats, `bool`,
/// `String`, `Vec<u8>`, `chrono` date and time types, `Uuid`,
/// `serde_json::Value` and `Decimal`. Wrap a type in `Option` to make the
/// column nullable.
///
/// # Example
///
/// ```ignore
/// use berth::{FromRow, Model};
///
/// #[derive(Debug, Clone, Model, FromRow)]
/// #[table_name = "users"]
/// struct User {
///     #[primary_key]
///     id: u32,
///     user_name: String,
///     email: Option<String>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(table_name, primary_key, column_name, column_type))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    macros::derive_model(input)
}

/// Derive macro for `FromRow` - generates row decoding
///
/// Generates the `berth::FromRow` implementation for converting a
/// `may_postgres::Row` into the record struct. Columns are read by name;
/// `#[column_name = "..."]` overrides the snake_cased field name. Unsigned
/// integer fields are read through their signed wire type and cast.
#[proc_macro_derive(FromRow, attributes(column_name))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    macros::derive_from_row(input)
}
