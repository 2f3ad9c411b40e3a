use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::DeductionConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for the admin-controlled deduction settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Current deduction settings.
    ///
    /// When nothing has been stored yet the returned caps are zero, which the
    /// calculator treats as "use the defaults".
    async fn get_deduction_config(&self) -> Result<DeductionConfig, RepositoryError>;

    async fn update_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<DeductionConfig, RepositoryError>;

    async fn update_k_receipt_deduction(
        &self,
        amount: Decimal,
    ) -> Result<DeductionConfig, RepositoryError>;
}
