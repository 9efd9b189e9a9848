//! Parameter conversion for MySQL

use crate::value::Value;
use chrono::{Datelike, Timelike};
use mysql_async::{Params, Value as MySqlValue};

/// Convert a sqlbulk Value to a mysql_async Value
pub fn to_mysql_value(value: &Value) -> MySqlValue {
    match value {
        Value::Null => MySqlValue::NULL,
        Value::Bool(v) => MySqlValue::from(*v),
        Value::I8(v) => MySqlValue::from(*v),
        Value::I16(v) => MySqlValue::from(*v),
        Value::I32(v) => MySqlValue::from(*v),
        Value::I64(v) => MySqlValue::from(*v),
        Value::U8(v) => MySqlValue::from(*v),
        Value::U16(v) => MySqlValue::from(*v),
        Value::U32(v) => MySqlValue::from(*v),
        Value::U64(v) => MySqlValue::from(*v),
        Value::F32(v) => MySqlValue::from(*v),
        Value::F64(v) => MySqlValue::from(*v),
        Value::String(v) => MySqlValue::from(v.as_str()),
        Value::Bytes(v) => MySqlValue::from(v.as_slice()),
        Value::Date(v) => {
            MySqlValue::Date(v.year() as u16, v.month() as u8, v.day() as u8, 0, 0, 0, 0)
        }
        Value::DateTime(v) => MySqlValue::Date(
            v.year() as u16,
            v.month() as u8,
            v.day() as u8,
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            v.and_utc().timestamp_subsec_micros(),
        ),
        Value::Time(v) => MySqlValue::Time(
            false, // not negative
            0,     // days
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            v.nanosecond() / 1000, // microseconds
        ),
        Value::Decimal(v) => MySqlValue::from(v.to_string()),
        Value::Json(v) => MySqlValue::from(v.to_string()),
    }
}

/// Convert a parameter list to positional mysql_async params.
///
/// An empty list maps to `Params::Empty`, which mysql_async requires for
/// statements without placeholders.
pub fn to_mysql_params(params: &[Value]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(to_mysql_value).collect())
    }
}
