//! MySQL executor for sqlbulk

mod pool;
mod transaction;
mod types;

pub use pool::{MySqlPool, MySqlPoolBuilder};
pub use transaction::MySqlTransaction;

/// Dialect name reported by the MySQL executors.
pub const DIALECT: &str = "mysql";
