//! Progressive personal income tax calculation.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Validate income, withholding and every allowance |
//! | 2    | Add the personal allowance (configured cap, or 60,000 when unset) |
//! | 3    | Total deduction (donation capped at 100,000, k-receipt at the configured cap or 50,000) |
//! | 4    | Taxable income (income - total deduction, may be negative) |
//! | 5    | Tax per bracket and gross tax |
//! | 6    | Net tax or refund (gross tax - withholding) |
//! | 7    | Round tax and refund to one decimal place |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{ProgressiveTaxCalculator, TaxCalculator};
//! use tax_core::{AllowanceInput, AllowanceType, DeductionCaps, TaxInput};
//!
//! let input = TaxInput {
//!     income: dec!(500000.0),
//!     withholding: dec!(0.0),
//!     allowances: vec![AllowanceInput::new(AllowanceType::Donation, dec!(200000.0))],
//! };
//! let caps = DeductionCaps::new(dec!(60000), dec!(50000));
//!
//! let result = ProgressiveTaxCalculator::default()
//!     .calculate(&input, &caps)
//!     .unwrap();
//!
//! assert_eq!(result.tax, dec!(19000.0));
//! assert_eq!(result.refund, dec!(0));
//! assert_eq!(result.levels[1].tax, dec!(19000.0));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{max, min, round_half_up};
use crate::models::{
    Allowance, AllowanceInput, AllowanceType, DeductionCaps, TAX_BRACKETS, TaxBracket,
    TaxCalculation, TaxInput, TaxLevel,
};

/// Personal allowance applied when no cap is configured.
pub const DEFAULT_PERSONAL_ALLOWANCE: Decimal = Decimal::from_parts(60_000, 0, 0, false, 0);

/// K-receipt cap applied when no cap is configured.
pub const DEFAULT_K_RECEIPT_ALLOWANCE: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);

/// Fixed donation cap.
pub const MAX_DONATION_ALLOWANCE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Errors that can occur during a tax calculation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxCalculationError {
    /// A value that must be zero or more was negative.
    #[error("value must be positive: {field}")]
    InvalidInput { field: &'static str },

    /// Withholding tax was greater than the income it was withheld from.
    #[error("with holding tax must be lower than or equal to income")]
    WithholdingExceedsIncome,

    /// An allowance carried a type tag outside the known set.
    #[error("incorrect allowance type '{0}'")]
    UnknownAllowanceType(String),
}

/// Computes tax for one taxpayer.
///
/// Implementations must be pure: the same input and caps always give the
/// same result.
pub trait TaxCalculator: Send + Sync {
    fn calculate(
        &self,
        input: &TaxInput,
        caps: &DeductionCaps,
    ) -> Result<TaxCalculation, TaxCalculationError>;
}

/// Calculator for the progressive rate schedule.
#[derive(Debug, Clone)]
pub struct ProgressiveTaxCalculator<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl<'a> ProgressiveTaxCalculator<'a> {
    /// Creates a calculator over `tax_brackets`.
    ///
    /// Brackets must be sorted by `min_income` ascending and contiguous; only
    /// the last may have `max_income` as `None`.
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Checks the input in a fixed order and returns the typed allowances.
    fn validate(
        &self,
        input: &TaxInput,
    ) -> Result<Vec<Allowance>, TaxCalculationError> {
        if input.income < Decimal::ZERO {
            return Err(TaxCalculationError::InvalidInput { field: "income" });
        }
        if input.withholding < Decimal::ZERO {
            return Err(TaxCalculationError::InvalidInput {
                field: "withholding",
            });
        }
        if input.withholding > input.income {
            return Err(TaxCalculationError::WithholdingExceedsIncome);
        }

        input.allowances.iter().map(Self::validate_allowance).collect()
    }

    fn validate_allowance(allowance: &AllowanceInput) -> Result<Allowance, TaxCalculationError> {
        if allowance.amount < Decimal::ZERO {
            return Err(TaxCalculationError::InvalidInput { field: "amount" });
        }
        let allowance_type = AllowanceType::parse(&allowance.allowance_type).ok_or_else(|| {
            TaxCalculationError::UnknownAllowanceType(allowance.allowance_type.clone())
        })?;

        Ok(Allowance {
            allowance_type,
            amount: allowance.amount,
        })
    }

    /// The personal allowance every taxpayer receives.
    fn personal_allowance(
        &self,
        caps: &DeductionCaps,
    ) -> Allowance {
        let amount = if caps.personal.is_zero() {
            DEFAULT_PERSONAL_ALLOWANCE
        } else {
            caps.personal
        };

        Allowance {
            allowance_type: AllowanceType::Personal,
            amount,
        }
    }

    /// Sums allowances after applying the donation and k-receipt caps.
    ///
    /// Saturates at `Decimal::MAX`; any sum that large already leaves no
    /// taxable income.
    fn total_deduction(
        &self,
        allowances: &[Allowance],
        caps: &DeductionCaps,
    ) -> Decimal {
        let k_receipt_cap = if caps.k_receipt.is_zero() {
            DEFAULT_K_RECEIPT_ALLOWANCE
        } else {
            caps.k_receipt
        };

        allowances
            .iter()
            .map(|allowance| match allowance.allowance_type {
                AllowanceType::Personal => allowance.amount,
                AllowanceType::Donation => min(allowance.amount, MAX_DONATION_ALLOWANCE),
                AllowanceType::KReceipt => min(allowance.amount, k_receipt_cap),
            })
            .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
    }

    /// Tax owed inside a single bracket; zero when the bracket is not reached.
    fn bracket_tax(
        bracket: &TaxBracket,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= bracket.min_income {
            return Decimal::ZERO;
        }

        let upper = match bracket.max_income {
            Some(max_income) => min(taxable_income, max_income),
            None => taxable_income,
        };

        (upper - bracket.min_income) * bracket.tax_rate
    }

    /// Gross tax and the per-bracket breakdown in one pass over the schedule.
    fn progressive_tax(
        &self,
        taxable_income: Decimal,
    ) -> (Decimal, Vec<TaxLevel>) {
        let mut gross_tax = Decimal::ZERO;
        let levels = self
            .tax_brackets
            .iter()
            .map(|bracket| {
                let tax = Self::bracket_tax(bracket, taxable_income);
                gross_tax += tax;
                TaxLevel {
                    level: bracket.label.to_string(),
                    tax: round_half_up(tax),
                }
            })
            .collect();

        (gross_tax, levels)
    }

    /// Splits `gross_tax - withholding` into (tax, refund).
    fn settle(
        &self,
        gross_tax: Decimal,
        withholding: Decimal,
    ) -> (Decimal, Decimal) {
        let net = gross_tax - withholding;
        let tax = round_half_up(max(net, Decimal::ZERO));
        let refund = round_half_up(max(-net, Decimal::ZERO));

        (tax, refund)
    }
}

impl Default for ProgressiveTaxCalculator<'static> {
    fn default() -> Self {
        Self::new(&TAX_BRACKETS)
    }
}

impl TaxCalculator for ProgressiveTaxCalculator<'_> {
    fn calculate(
        &self,
        input: &TaxInput,
        caps: &DeductionCaps,
    ) -> Result<TaxCalculation, TaxCalculationError> {
        let mut allowances = self.validate(input)?;
        allowances.push(self.personal_allowance(caps));

        let total_deduction = self.total_deduction(&allowances, caps);
        let taxable_income = input.income - total_deduction;
        let (gross_tax, levels) = self.progressive_tax(taxable_income);
        let (tax, refund) = self.settle(gross_tax, input.withholding);

        debug!(
            income = %input.income,
            %total_deduction,
            %taxable_income,
            %gross_tax,
            %tax,
            %refund,
            "tax calculated"
        );

        Ok(TaxCalculation {
            tax,
            refund,
            levels,
        })
    }
}
