pub mod calculations;
pub mod db;
pub mod models;

pub use calculations::{ProgressiveTaxCalculator, TaxCalculationError, TaxCalculator};
pub use db::repository::{RepositoryError, SettingsRepository};
pub use models::*;
