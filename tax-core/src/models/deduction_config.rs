use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Smallest personal cap an administrator may set.
pub const MIN_PERSONAL_CAP: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Largest personal cap an administrator may set.
pub const MAX_PERSONAL_CAP: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Largest k-receipt cap an administrator may set. The lower bound is exclusive zero.
pub const MAX_K_RECEIPT_CAP: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Whether `amount` is an acceptable personal cap (10,000 to 100,000 inclusive).
pub fn personal_cap_in_range(amount: Decimal) -> bool {
    (MIN_PERSONAL_CAP..=MAX_PERSONAL_CAP).contains(&amount)
}

/// Whether `amount` is an acceptable k-receipt cap (above zero, up to 100,000).
pub fn k_receipt_cap_in_range(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount <= MAX_K_RECEIPT_CAP
}

/// Persisted deduction settings. A single row is kept per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionConfig {
    pub id: i64,
    pub personal: Decimal,
    pub k_receipt: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeductionConfig {
    /// A config with no caps set, as reported before any row is stored.
    pub fn unset(at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            personal: Decimal::ZERO,
            k_receipt: Decimal::ZERO,
            created_at: at,
            updated_at: at,
        }
    }

    /// The caps the calculator reads from this row.
    pub fn caps(&self) -> DeductionCaps {
        DeductionCaps {
            personal: self.personal,
            k_receipt: self.k_receipt,
        }
    }
}

/// Personal and k-receipt caps. A zero cap means "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCaps {
    pub personal: Decimal,
    pub k_receipt: Decimal,
}

impl DeductionCaps {
    pub fn new(
        personal: Decimal,
        k_receipt: Decimal,
    ) -> Self {
        Self {
            personal,
            k_receipt,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn personal_cap_bounds_are_inclusive() {
        assert!(personal_cap_in_range(dec!(10000)));
        assert!(personal_cap_in_range(dec!(100000)));
        assert!(personal_cap_in_range(dec!(60000.5)));
        assert!(!personal_cap_in_range(dec!(9999.9)));
        assert!(!personal_cap_in_range(dec!(100000.1)));
    }

    #[test]
    fn k_receipt_cap_excludes_zero() {
        assert!(k_receipt_cap_in_range(dec!(0.1)));
        assert!(k_receipt_cap_in_range(dec!(100000)));
        assert!(!k_receipt_cap_in_range(dec!(0)));
        assert!(!k_receipt_cap_in_range(dec!(-1)));
        assert!(!k_receipt_cap_in_range(dec!(100001)));
    }

    #[test]
    fn unset_config_has_zero_caps() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        let config = DeductionConfig::unset(at);

        assert_eq!(config.caps(), DeductionCaps::default());
        assert_eq!(config.created_at, at);
        assert_eq!(config.updated_at, at);
    }

    #[test]
    fn caps_copies_stored_amounts() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let config = DeductionConfig {
            id: 1,
            personal: dec!(70000),
            k_receipt: dec!(30000),
            created_at: at,
            updated_at: at,
        };

        assert_eq!(config.caps(), DeductionCaps::new(dec!(70000), dec!(30000)));
    }
}
