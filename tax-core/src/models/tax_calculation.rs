use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AllowanceInput;

/// Inputs for a single personal income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub income: Decimal,
    pub withholding: Decimal,
    pub allowances: Vec<AllowanceInput>,
}

/// Tax owed within one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLevel {
    pub level: String,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    /// Tax still payable after withholding.
    pub tax: Decimal,
    /// Withholding in excess of the tax owed.
    pub refund: Decimal,
    /// One entry per bracket, lowest first.
    pub levels: Vec<TaxLevel>,
}
