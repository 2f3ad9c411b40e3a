//! SQLite backend for the deduction settings store.

pub mod decimal;
pub mod factory;
pub mod repository;

pub use factory::{SqliteRepositoryFactory, connection_url, seeds_dir};
pub use repository::{DEDUCTION_CONFIG_ID, SqliteRepository};
