//! Derive macro for the `FromRow` trait
//!
//! Generates the `FromRow` implementation for decoding a `may_postgres::Row`
//! into the record struct by column name. Kept separate from `Model` so a
//! record used only for writes does not need decodable columns.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Fields, LitStr};

use crate::attributes;
use crate::macros::model::{extract_option_inner_type, unsigned_read_type};
use crate::utils;

/// Generate a FromRow implementation for a record struct
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_from_row(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

pub(crate) fn expand_from_row(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "FromRow can only be derived for structs with named fields",
            ));
        }
    };

    let from_row_fields: Vec<TokenStream2> = fields
        .iter()
        .map(|field| {
            let field_ident = field.ident.as_ref().unwrap();
            let field_type = &field.ty;

            let column = attributes::extract_column_name(field)
                .unwrap_or_else(|| utils::snake_case(&field_ident.to_string()));
            let column_lit = LitStr::new(&column, field_ident.span());

            // Unsigned fields are read through their signed wire type.
            let get_expr = if let Some(signed) = unsigned_read_type(field_type) {
                quote! {
                    {
                        let value: #signed = row.try_get(#column_lit)?;
                        value as #field_type
                    }
                }
            } else if let Some(inner) = extract_option_inner_type(field_type) {
                if let Some(signed) = unsigned_read_type(inner) {
                    quote! {
                        {
                            let value: Option<#signed> = row.try_get(#column_lit)?;
                            value.map(|v| v as #inner)
                        }
                    }
                } else {
                    quote! { row.try_get(#column_lit)? }
                }
            } else {
                quote! { row.try_get(#column_lit)? }
            };

            quote! {
                #field_ident: #get_expr,
            }
        })
        .collect();

    Ok(quote! {
        impl berth::FromRow for #struct_name {
            fn from_row(row: &may_postgres::Row) -> Result<Self, may_postgres::Error> {
                Ok(Self {
                    #(#from_row_fields)*
                })
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
            struct Flat(i64, String);
        };
        let err = expand_from_row(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FromRow can only be derived for structs with named fields"
        );
    }

    #[test]
    fn test_named_struct_expands() {
        let input: DeriveInput = parse_quote! {
            struct Reading {
                id: u32,
                label: String,
            }
        };
        assert!(expand_from_row(&input).is_ok());
    }
}
