//! Record trait: the static schema descriptor of a bulk-insertable struct

use crate::value::Value;

/// Static description of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// The Rust field identifier (without any `r#` prefix)
    pub ident: &'static str,
    /// Explicit column name from `#[bulk(column = "...")]`
    pub column: Option<&'static str>,
    /// Field marked with `#[bulk(skip)]`
    pub skip: bool,
}

impl FieldDef {
    /// Create a field definition with no annotations.
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            column: None,
            skip: false,
        }
    }

    /// Set an explicit column name.
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// Exclude the field from every statement.
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// A struct whose values can be bulk inserted.
///
/// This trait is typically implemented via `#[derive(Record)]`. Field
/// positions are the declaration order; `value_at` and `is_zero_at` are
/// only called for positions whose field is not skipped.
///
/// # Manual Implementation
///
/// ```ignore
/// use sqlbulk::{ColumnValue, FieldDef, Record, Value};
///
/// pub struct User {
///     pub id: i64,
///     pub user_name: String,
/// }
///
/// impl Record for User {
///     const TYPE_NAME: &'static str = "User";
///     const TABLE_NAME: Option<&'static str> = Some("tb_user");
///
///     fn fields() -> &'static [FieldDef] {
///         const FIELDS: &[FieldDef] = &[FieldDef::new("id"), FieldDef::new("user_name").column("name")];
///         FIELDS
///     }
///
///     fn value_at(&self, index: usize) -> Value {
///         match index {
///             0 => self.id.to_value(),
///             1 => self.user_name.to_value(),
///             _ => Value::Null,
///         }
///     }
///
///     fn is_zero_at(&self, index: usize) -> bool {
///         match index {
///             0 => self.id.is_zero(),
///             1 => self.user_name.is_zero(),
///             _ => true,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// The struct name, snake-cased when no table name is given.
    const TYPE_NAME: &'static str;

    /// Table name override from `#[bulk(table = "...")]`, used verbatim.
    const TABLE_NAME: Option<&'static str> = None;

    /// All fields in declaration order, skipped ones included.
    fn fields() -> &'static [FieldDef];

    /// The value of the field at `index`.
    fn value_at(&self, index: usize) -> Value;

    /// Whether the field at `index` holds its type's zero value.
    fn is_zero_at(&self, index: usize) -> bool;
}
