//! Core traits for sqlbulk

mod column_value;
mod pool;
mod record;
mod transaction;

pub use column_value::ColumnValue;
pub use pool::{ExecuteResult, Pool};
pub use record::{FieldDef, Record};
pub use transaction::{IsolationLevel, Transaction, Transactional};
