//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{spanned::Spanned, Attribute, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// Per-field configuration parsed from `#[bulk(...)]`
struct FieldConfig {
    ident: Ident,
    /// Explicit column name, if any
    column: Option<String>,
    skip: bool,
}

fn parse_table_name(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut table = None;

    for attr in attrs {
        if attr.path().is_ident("bulk") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(Error::new(lit.span(), "table name must not be empty"));
                    }
                    table = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error(format!(
                        "unknown bulk struct attribute `{}`",
                        path_name(&meta.path)
                    )))
                }
            })?;
        }
    }

    Ok(table)
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut column = None;
    let mut skip = false;

    for attr in &field.attrs {
        if attr.path().is_ident("bulk") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    validate_column(&lit)?;
                    column = Some(lit.value());
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown bulk field attribute `{}`",
                        path_name(&meta.path)
                    )));
                }
                Ok(())
            })?;
        }
    }

    if skip && column.is_some() {
        return Err(Error::new(
            field.span(),
            "`skip` and `column` cannot be combined",
        ));
    }

    Ok(FieldConfig {
        ident,
        column,
        skip,
    })
}

/// Column names are spliced into SQL text as-is, so keep them to a safe alphabet.
fn validate_column(lit: &syn::LitStr) -> Result<()> {
    let value = lit.value();
    if value.is_empty() {
        return Err(Error::new(lit.span(), "column name must not be empty"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::new(
            lit.span(),
            "column name may only contain ASCII letters, digits, `_` and `-`",
        ));
    }
    Ok(())
}

fn path_name(path: &syn::Path) -> String {
    path.get_ident().map(|i| i.to_string()).unwrap_or_default()
}

pub fn derive_record_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let table = match parse_table_name(&input.attrs)? {
        Some(table) => quote! { ::std::option::Option::Some(#table) },
        None => quote! { ::std::option::Option::None },
    };
    let type_name = name.unraw().to_string();

    let field_configs: Vec<FieldConfig> = fields
        .iter()
        .map(parse_field_config)
        .collect::<Result<Vec<_>>>()?;

    let field_defs: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let ident = config.ident.unraw().to_string();
            let mut def = quote! { sqlbulk::FieldDef::new(#ident) };
            if let Some(column) = &config.column {
                def = quote! { #def.column(#column) };
            }
            if config.skip {
                def = quote! { #def.skip() };
            }
            def
        })
        .collect();

    // Skipped fields get no accessor arm, so their types need not implement ColumnValue
    let included: Vec<(usize, &Ident)> = field_configs
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.skip)
        .map(|(i, c)| (i, &c.ident))
        .collect();

    let value_arms = included.iter().map(|(index, ident)| {
        quote! { #index => sqlbulk::ColumnValue::to_value(&self.#ident) }
    });
    let zero_arms = included.iter().map(|(index, ident)| {
        quote! { #index => sqlbulk::ColumnValue::is_zero(&self.#ident) }
    });

    let expanded = quote! {
        impl #impl_generics sqlbulk::Record for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE_NAME: ::std::option::Option<&'static str> = #table;

            fn fields() -> &'static [sqlbulk::FieldDef] {
                const FIELDS: &[sqlbulk::FieldDef] = &[#(#field_defs),*];
                FIELDS
            }

            fn value_at(&self, index: usize) -> sqlbulk::Value {
                match index {
                    #(#value_arms,)*
                    _ => sqlbulk::Value::Null,
                }
            }

            fn is_zero_at(&self, index: usize) -> bool {
                match index {
                    #(#zero_arms,)*
                    _ => true,
                }
            }
        }
    };

    Ok(expanded)
}
