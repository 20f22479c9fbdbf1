//! Infrastructure layer: storage, spreadsheet files, configuration.

pub mod config;
pub mod import;
pub mod seed;
pub mod spreadsheet;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use import::{Upload, run_import};
pub use store::{InMemoryItemStore, ItemStore, SqliteItemStore, StoreError};
