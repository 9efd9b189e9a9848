//! Dynamic Value type for statement parameters

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// A dynamic database value bound to one `?` placeholder.
///
/// Bulk statements carry their arguments as a flat `Vec<Value>`, in column
/// order, record after record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL value
    Null,
    /// Boolean value
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// String/text value
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Date value
    Date(NaiveDate),
    /// DateTime/Timestamp value
    DateTime(NaiveDateTime),
    /// Time value
    Time(NaiveTime),
    /// Decimal value
    Decimal(Decimal),
    /// JSON value
    Json(serde_json::Value),
}

impl Value {
    /// Get the type name for statement trace logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
            Value::Decimal(_) => "decimal",
            Value::Json(_) => "json",
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    Decimal => Decimal,
    serde_json::Value => Json,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
