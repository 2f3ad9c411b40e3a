//! Conversions between `Decimal` amounts and SQLite's numeric storage.
//!
//! Caps are stored in `REAL` columns. A value written as an integer literal
//! (seed files, manual edits) comes back as `INTEGER`, so reads accept both.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};
use tax_core::RepositoryError;

/// Read a money column. `NULL` reads as zero, which the calculator treats as
/// "use the default cap".
pub fn get_amount(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(Decimal::ZERO);
    }

    let type_name = value_ref.type_info().name().to_string();
    match type_name.as_str() {
        "INTEGER" => row
            .try_get::<i64, _>(column)
            .map(Decimal::from)
            .map_err(|e| RepositoryError::Database(format!("Failed to read '{}': {}", column, e))),
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to read '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            other, column
        ))),
    }
}

/// Convert an amount for binding into a `REAL` column.
pub fn amount_to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}
