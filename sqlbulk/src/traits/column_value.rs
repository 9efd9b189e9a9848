//! ColumnValue trait for field values that can be bound to a bulk statement

use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

/// A field type that can be sent as a statement parameter.
///
/// Besides the conversion to [`Value`], every column type knows its own zero
/// value. Column resolution treats a zero field as "not determined yet" and
/// keeps scanning the batch until some record carries a non-zero value for
/// that position.
///
/// Implement this for custom types (e.g. enums stored as strings).
pub trait ColumnValue {
    /// Convert this value to a database value.
    fn to_value(&self) -> Value;

    /// Whether this value equals the default value of its type.
    fn is_zero(&self) -> bool;
}

macro_rules! impl_column_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ColumnValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn is_zero(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )*
    };
}

impl_column_value! {
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
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    Decimal => Decimal,
}

impl ColumnValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ColumnValue for &str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ColumnValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

// Stored as a naive UTC timestamp; MySQL DATETIME has no zone.
impl ColumnValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::DateTime(self.naive_utc())
    }

    fn is_zero(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

impl ColumnValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

impl<T: ColumnValue> ColumnValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: ColumnValue> ColumnValue for &T {
    fn to_value(&self) -> Value {
        (*self).to_value()
    }

    fn is_zero(&self) -> bool {
        (*self).is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert!(0i32.is_zero());
        assert!(0i64.is_zero());
        assert!(String::new().is_zero());
        assert!("".is_zero());
        assert!(0.0f64.is_zero());
        assert!(false.is_zero());
        assert!(Option::<i32>::None.is_zero());
        assert!(Decimal::ZERO.is_zero());
        assert!(serde_json::Value::Null.is_zero());
        assert!(NaiveDateTime::default().is_zero());
    }

    #[test]
    fn test_non_zero_values() {
        assert!(!42i32.is_zero());
        assert!(!"foo".is_zero());
        assert!(!"foo".to_string().is_zero());
        assert!(!0.1f64.is_zero());
        assert!(!true.is_zero());
        assert!(!Utc::now().is_zero());
        assert!(!Utc::now().naive_utc().is_zero());
        // Some(0) is a present value even though the inner value is zero
        assert!(!Some(0i32).is_zero());
    }

    #[test]
    fn test_to_value() {
        assert_eq!(22i64.to_value(), Value::I64(22));
        assert_eq!("sunary".to_value(), Value::String("sunary".into()));
        assert_eq!(Some(7u8).to_value(), Value::U8(7));
        assert_eq!(Option::<String>::None.to_value(), Value::Null);
        assert_eq!(vec![1u8, 2].to_value(), Value::Bytes(vec![1, 2]));
    }
}
