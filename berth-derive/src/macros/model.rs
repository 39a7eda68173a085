//! Model derive macro implementation
//!
//! Generates the `Model` implementation (table metadata) and the `ToRow`
//! implementation (column values for inserts and updates) for a struct with
//! named fields.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DataStruct, DeriveInput, Fields, GenericArgument, Ident, LitStr,
    PathArguments, PathSegment, Type,
};

use crate::attributes;
use crate::utils;

/// Extract the inner type from Option<T>
/// Returns None if the type is not Option<T>
pub(crate) fn extract_option_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
                        return Some(inner_type);
                    }
                }
            }
        }
    }
    None
}

/// Signed type to read an unsigned field through; the wire protocol only
/// carries signed integers.
pub(crate) fn unsigned_read_type(ty: &Type) -> Option<proc_macro2::TokenStream> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    match segment.ident.to_string().as_str() {
        "u8" => Some(quote! { i16 }),
        "u16" => Some(quote! { i32 }),
        "u32" | "u64" => Some(quote! { i64 }),
        _ => None,
    }
}

fn is_u8_vec(segment: &PathSegment) -> bool {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(Type::Path(inner))) = args.args.first() {
            return inner.path.is_ident("u8");
        }
    }
    false
}

/// Map a Rust type to its `FieldKind` variant name.
///
/// Matches on the last path segment, so `chrono::NaiveDateTime` and a plain
/// `NaiveDateTime` import both work.
fn field_kind_for_type(ty: &Type) -> Option<&'static str> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let kind = match segment.ident.to_string().as_str() {
        "bool" => "Bool",
        "i8" | "i16" | "u8" => "SmallInt",
        "i32" | "u16" => "Int",
        "i64" | "u32" | "u64" => "BigInt",
        "f32" => "Float",
        "f64" => "Double",
        "String" => "Text",
        "NaiveDateTime" | "DateTime" => "DateTime",
        "NaiveDate" => "Date",
        "Uuid" => "Uuid",
        "Value" => "Json",
        "Decimal" => "Decimal",
        "Vec" => {
            if is_u8_vec(segment) {
                "Bytes"
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(kind)
}

/// Parse a `column_type` override value.
fn field_kind_from_attr(value: &str) -> Option<&'static str> {
    let kind = match value {
        "bool" => "Bool",
        "small_int" => "SmallInt",
        "int" => "Int",
        "big_int" => "BigInt",
        "float" => "Float",
        "double" => "Double",
        "text" => "Text",
        "bytes" => "Bytes",
        "date_time" => "DateTime",
        "date" => "Date",
        "uuid" => "Uuid",
        "json" => "Json",
        "decimal" => "Decimal",
        _ => return None,
    };
    Some(kind)
}

/// Generate Model and ToRow implementations for a struct
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_model(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

pub(crate) fn expand_model(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let table_name = attributes::extract_table_name(&input.attrs)
        .unwrap_or_else(|| format!("{}s", utils::snake_case(&struct_name.to_string())));
    let table_name_lit = LitStr::new(&table_name, struct_name.span());

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Model can only be derived for structs with named fields",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut row_entries = Vec::new();
    let mut primary_key: Option<String> = None;

    for field in fields {
        let field_ident = field.ident.as_ref().unwrap();
        let field_name = field_ident.to_string();
        let column = attributes::extract_column_name(field)
            .unwrap_or_else(|| utils::snake_case(&field_name));

        let (value_type, nullable) = match extract_option_inner_type(&field.ty) {
            Some(inner) => (inner, true),
            None => (&field.ty, false),
        };

        let kind = match attributes::extract_column_type(field) {
            Some(value) => match field_kind_from_attr(&value) {
                Some(kind) => kind,
                None => {
                    return Err(syn::Error::new_spanned(
                        field,
                        format!("unknown column_type `{value}`"),
                    ));
                }
            },
            None => match field_kind_for_type(value_type) {
                Some(kind) => kind,
                None => {
                    return Err(syn::Error::new_spanned(
                        field,
                        format!(
                            "cannot map field `{field_name}` to a column type; \
                             add #[column_type = \"...\"]"
                        ),
                    ));
                }
            },
        };
        let kind_ident = Ident::new(kind, field_ident.span());

        let field_name_lit = LitStr::new(&field_name, field_ident.span());
        let column_lit = LitStr::new(&column, field_ident.span());
        if nullable {
            field_defs.push(quote! {
                berth::FieldDef::new(#field_name_lit, #column_lit, berth::FieldKind::#kind_ident)
                    .nullable()
            });
        } else {
            field_defs.push(quote! {
                berth::FieldDef::new(#field_name_lit, #column_lit, berth::FieldKind::#kind_ident)
            });
        }

        row_entries.push(quote! {
            (#column_lit.to_string(), sea_query::Value::from(self.#field_ident.clone()))
        });

        if attributes::has_attribute(field, "primary_key") {
            if primary_key.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may carry #[primary_key]",
                ));
            }
            primary_key = Some(column);
        }
    }

    let pk = primary_key.unwrap_or_else(|| "id".to_string());
    let pk_lit = LitStr::new(&pk, struct_name.span());

    Ok(quote! {
        impl berth::Model for #struct_name {
            fn table_name() -> &'static str {
                #table_name_lit
            }

            fn fields() -> Vec<berth::FieldDef> {
                vec![
                    #(#field_defs),*
                ]
            }

            fn primary_key() -> &'static str {
                #pk_lit
            }
        }

        impl berth::ToRow for #struct_name {
            fn to_row(&self) -> Vec<(String, sea_query::Value)> {
                vec![
                    #(#row_entries),*
                ]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_named_fields_required() {
        let input: DeriveInput = parse_quote! {
            struct Broken(i32);
        };
        let err = expand_model(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model can only be derived for structs with named fields"
        );
    }

    #[test]
    fn test_unknown_column_type_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Article {
                #[column_type = "varchar"]
                title: String,
            }
        };
        let err = expand_model(&input).unwrap_err();
        assert_eq!(err.to_string(), "unknown column_type `varchar`");
    }

    #[test]
    fn test_unmappable_type_needs_override() {
        let input: DeriveInput = parse_quote! {
            struct Sensor {
                readings: Vec<String>,
            }
        };
        let err = expand_model(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot map field `readings` to a column type; add #[column_type = \"...\"]"
        );
    }

    #[test]
    fn test_second_primary_key_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Account {
                #[primary_key]
                id: i64,
                #[primary_key]
                email: String,
            }
        };
        let err = expand_model(&input).unwrap_err();
        assert_eq!(err.to_string(), "only one field may carry #[primary_key]");
    }

    #[test]
    fn test_known_types_expand() {
        let input: DeriveInput = parse_quote! {
            struct Reading {
                id: i64,
                label: String,
                value: Option<f64>,
            }
        };
        assert!(expand_model(&input).is_ok());
    }
}
