use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowanceType {
    Personal,
    Donation,
    KReceipt,
}

impl AllowanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(Self::Personal),
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            _ => None,
        }
    }
}

/// An allowance as supplied by a caller, before its type tag is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceInput {
    pub allowance_type: String,
    pub amount: Decimal,
}

impl AllowanceInput {
    pub fn new(
        allowance_type: AllowanceType,
        amount: Decimal,
    ) -> Self {
        Self {
            allowance_type: allowance_type.as_str().to_string(),
            amount,
        }
    }
}

/// A validated allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub allowance_type: AllowanceType,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_accepts_wire_tags() {
        assert_eq!(AllowanceType::parse("personal"), Some(AllowanceType::Personal));
        assert_eq!(AllowanceType::parse("donation"), Some(AllowanceType::Donation));
        assert_eq!(AllowanceType::parse("k-receipt"), Some(AllowanceType::KReceipt));
    }

    #[test]
    fn parse_rejects_unknown_and_differently_cased_tags() {
        assert_eq!(AllowanceType::parse("shop"), None);
        assert_eq!(AllowanceType::parse(""), None);
        assert_eq!(AllowanceType::parse("Donation"), None);
        assert_eq!(AllowanceType::parse("kReceipt"), None);
    }

    #[test]
    fn as_str_matches_parse() {
        for kind in [
            AllowanceType::Personal,
            AllowanceType::Donation,
            AllowanceType::KReceipt,
        ] {
            assert_eq!(AllowanceType::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn input_new_uses_wire_tag() {
        let input = AllowanceInput::new(AllowanceType::KReceipt, dec!(1000));

        assert_eq!(input.allowance_type, "k-receipt");
        assert_eq!(input.amount, dec!(1000));
    }
}
