//! Batch tax files and settings database preparation.

mod loader;

pub use loader::{TaxFileError, TaxFileLoader, TaxFileRecord};
