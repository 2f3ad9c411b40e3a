//! Tax calculation modules.
//!
//! This module provides the progressive personal income tax calculator and
//! the rounding helpers it shares with its callers.

pub mod common;
pub mod personal_income;

pub use personal_income::{
    DEFAULT_K_RECEIPT_ALLOWANCE, DEFAULT_PERSONAL_ALLOWANCE, MAX_DONATION_ALLOWANCE,
    ProgressiveTaxCalculator, TaxCalculationError, TaxCalculator,
};
