//! Core module - transaction engine, lookups and configuration

pub mod aliases;
pub mod config;
pub mod developers;
pub mod history;
pub mod sample;
pub mod source;
pub mod store;
pub mod units;

pub use config::Config;
pub use history::{FlipEntry, PropertyFingerprint, PropertyHistory};
pub use sample::SampleSource;
pub use source::TransactionSource;
pub use store::{DataSource, QueryResult, StoreError, TransactionFilter, TransactionStore};
