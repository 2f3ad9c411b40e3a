use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{AllowanceInput, AllowanceType, TaxInput};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when reading a batch tax file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxFileError {
    /// A row (or the header) could not be decoded. `row` counts data rows
    /// from 1; the header is row 0.
    #[error("CSV parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("empty csv file given")]
    Empty,
}

/// A single row of a batch tax file.
///
/// The file carries a header naming its columns:
/// - `totalIncome`: gross annual income
/// - `wht`: tax already withheld (optional, empty means 0)
/// - `donation`: donation amount claimed (optional, empty means 0)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaxFileRecord {
    pub total_income: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub wht: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub donation: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl TaxFileRecord {
    /// Calculator input for this row: the withholding and a single donation
    /// allowance, with missing values read as zero.
    pub fn to_tax_input(&self) -> TaxInput {
        TaxInput {
            income: self.total_income,
            withholding: self.wht.unwrap_or(Decimal::ZERO),
            allowances: vec![AllowanceInput::new(
                AllowanceType::Donation,
                self.donation.unwrap_or(Decimal::ZERO),
            )],
        }
    }
}

/// Reader for batch tax files.
pub struct TaxFileLoader;

impl TaxFileLoader {
    /// Parse every data row from `reader`, in file order.
    ///
    /// Whitespace around fields is ignored. A file with a header but no rows
    /// is rejected with [`TaxFileError::Empty`].
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxFileRecord>, TaxFileError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: TaxFileRecord = result.map_err(|e| TaxFileError::Parse {
                row: index + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(TaxFileError::Empty);
        }

        debug!(rows = records.len(), "tax file parsed");
        Ok(records)
    }

    pub fn load_from_str(content: &str) -> Result<Vec<TaxFileRecord>, TaxFileError> {
        Self::parse(content.as_bytes())
    }
}
