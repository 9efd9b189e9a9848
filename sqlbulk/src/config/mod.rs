//! Configuration for bulk statement sizing

pub mod defaults;
mod settings;

pub use settings::BulkConfig;
