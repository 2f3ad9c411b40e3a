use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBracket {
    pub level: u8,
    pub label: &'static str,
    /// Exclusive lower bound.
    pub min_income: Decimal,
    /// Inclusive upper bound; `None` for the top bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

/// Progressive personal income tax schedule, lowest bracket first.
pub static TAX_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        level: 1,
        label: "0-150,000",
        min_income: Decimal::ZERO,
        max_income: Some(Decimal::from_parts(150_000, 0, 0, false, 0)),
        tax_rate: Decimal::ZERO,
    },
    TaxBracket {
        level: 2,
        label: "150,001-500,000",
        min_income: Decimal::from_parts(150_000, 0, 0, false, 0),
        max_income: Some(Decimal::from_parts(500_000, 0, 0, false, 0)),
        tax_rate: Decimal::from_parts(10, 0, 0, false, 2),
    },
    TaxBracket {
        level: 3,
        label: "500,001-1,000,000",
        min_income: Decimal::from_parts(500_000, 0, 0, false, 0),
        max_income: Some(Decimal::from_parts(1_000_000, 0, 0, false, 0)),
        tax_rate: Decimal::from_parts(15, 0, 0, false, 2),
    },
    TaxBracket {
        level: 4,
        label: "1,000,001-2,000,000",
        min_income: Decimal::from_parts(1_000_000, 0, 0, false, 0),
        max_income: Some(Decimal::from_parts(2_000_000, 0, 0, false, 0)),
        tax_rate: Decimal::from_parts(20, 0, 0, false, 2),
    },
    TaxBracket {
        level: 5,
        label: "2,000,001 ขึ้นไป",
        min_income: Decimal::from_parts(2_000_000, 0, 0, false, 0),
        max_income: None,
        tax_rate: Decimal::from_parts(35, 0, 0, false, 2),
    },
];
