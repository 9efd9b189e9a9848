//! sqlbulk - batched multi-row INSERT and upsert statements
//!
//! Turns a slice of records into as few `INSERT` statements as the
//! database's bound-parameter limit allows, and runs them in one transaction
//! on top of `mysql_async`.
//!
//! # Features
//!
//! - **Derive Macro**: `#[derive(Record)]` describes table, columns and skipped fields
//! - **Column Resolution**: fields that are zero in every record are left out
//! - **Batch Sizing**: batches stay under the placeholder budget of the dialect
//! - **Upserts**: `ON DUPLICATE KEY UPDATE` keyed on a set of unique columns
//!
//! # Example
//!
//! ```ignore
//! use sqlbulk::{MySqlPool, Record};
//!
//! #[derive(Record)]
//! #[bulk(table = "tb_user")]
//! pub struct User {
//!     pub id: i64,
//!     #[bulk(column = "name")]
//!     pub user_name: String,
//!     pub age: i32,
//!     #[bulk(skip)]
//!     pub hobby: String,
//! }
//!
//! async fn load(pool: &MySqlPool, users: &[User]) -> sqlbulk::Result<()> {
//!     sqlbulk::bulk_insert(pool, users).await?;
//!     sqlbulk::bulk_upsert(pool, users, &["name"]).await?;
//!     Ok(())
//! }
//! ```

// Lets the derive macro's `sqlbulk::` paths resolve inside this crate's own tests
extern crate self as sqlbulk;

pub mod batch;
pub mod config;
pub mod error;
pub mod mysql;
pub mod naming;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export the derive macro
pub use sqlbulk_derive::Record;

// Re-export main types
pub use batch::{
    bulk_insert, bulk_insert_with_table_name, bulk_upsert, bulk_upsert_with_table_name,
    BulkInsert, BulkPlan, Statement,
};
pub use crate::config::BulkConfig;
pub use error::{Error, Result};
pub use mysql::{MySqlPool, MySqlPoolBuilder, MySqlTransaction};
pub use schema::ColumnMapping;
pub use traits::{
    ColumnValue, ExecuteResult, FieldDef, IsolationLevel, Pool, Record, Transaction,
    Transactional,
};
pub use value::Value;
