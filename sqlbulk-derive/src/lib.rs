//! Derive macro for sqlbulk record schema descriptors
//!
//! `#[derive(Record)]` generates the static field list and value accessors
//! that the bulk insert planner reads. The macro is re-exported from the
//! `sqlbulk` crate, so users typically don't need to depend on this crate
//! directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derive macro for bulk-insertable structs.
///
/// # Attributes
///
/// - `#[bulk(table = "tb_user")]` on the struct - Use this table name verbatim
///   instead of the snake_cased struct name
/// - `#[bulk(column = "name")]` on a field - Use an explicit column name
///   instead of the snake_cased field name
/// - `#[bulk(skip)]` on a field - Never send this field
///
/// Every non-skipped field type must implement `sqlbulk::ColumnValue`.
///
/// # Example
///
/// ```ignore
/// use sqlbulk::Record;
///
/// #[derive(Record)]
/// #[bulk(table = "tb_user")]
/// pub struct User {
///     pub id: i64,
///     #[bulk(column = "name")]
///     pub user_name: String,
///     pub age: i32,
///     #[bulk(skip)]
///     pub hobby: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(bulk))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
