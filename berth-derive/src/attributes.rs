//! Attribute parsing utilities
//!
//! All value-carrying attributes use the name-value form, e.g.
//! `#[table_name = "users"]` or `#[column_name = "email_address"]`.

use syn::{Attribute, ExprLit, Field, Lit};

/// Read the string value of a name-value attribute.
fn string_value(attr: &Attribute) -> Option<String> {
    let meta = attr.meta.require_name_value().ok()?;
    if let syn::Expr::Lit(ExprLit {
        lit: Lit::Str(s), ..
    }) = &meta.value
    {
        Some(s.value())
    } else {
        None
    }
}

/// Extract table name from struct attributes
pub fn extract_table_name(attrs: &[Attribute]) -> Option<String> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident("table_name"))
        .and_then(string_value)
}

/// Extract column name from field attributes
pub fn extract_column_name(field: &Field) -> Option<String> {
    field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("column_name"))
        .and_then(string_value)
}

/// Extract the column type override from field attributes
pub fn extract_column_type(field: &Field) -> Option<String> {
    field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("column_type"))
        .and_then(string_value)
}

/// Check if field has a specific marker attribute
pub fn has_attribute(field: &Field, attr_name: &str) -> bool {
    field
        .attrs
        .iter()
        .any(|attr| attr.path().is_ident(attr_name))
}
