mod allowance;
mod deduction_config;
mod tax_bracket;
mod tax_calculation;

pub use allowance::{Allowance, AllowanceInput, AllowanceType};
pub use deduction_config::{
    DeductionCaps, DeductionConfig, MAX_K_RECEIPT_CAP, MAX_PERSONAL_CAP, MIN_PERSONAL_CAP,
    k_receipt_cap_in_range, personal_cap_in_range,
};
pub use tax_bracket::{TAX_BRACKETS, TaxBracket};
pub use tax_calculation::{TaxCalculation, TaxInput, TaxLevel};
