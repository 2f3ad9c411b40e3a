//! JSON body extraction with request validation.

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::{AppError, FieldError};

/// Request types that check their fields beyond what serde enforces.
pub trait Validate {
    /// Every failing field, in declaration order. Empty means valid.
    fn validate(&self) -> Vec<FieldError>;
}

/// Unwrap a JSON body, mapping decode failures to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Unwrap and validate a JSON body.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    let errors = value.validate();
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

/// "the value of {field} must be greater than or equal {bound}"
pub fn gte_message(
    field: &str,
    bound: impl std::fmt::Display,
) -> String {
    format!("the value of {field} must be greater than or equal {bound}")
}

/// "the value of {field} must be greater than {bound}"
pub fn gt_message(
    field: &str,
    bound: impl std::fmt::Display,
) -> String {
    format!("the value of {field} must be greater than {bound}")
}

/// "the value of {field} must be less than or equal {bound}"
pub fn lte_message(
    field: &str,
    bound: impl std::fmt::Display,
) -> String {
    format!("the value of {field} must be less than or equal {bound}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        amount: i64,
    }

    impl Validate for Probe {
        fn validate(&self) -> Vec<FieldError> {
            if self.amount < 0 {
                vec![FieldError::new("amount", gte_message("amount", 0))]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn valid_body_passes_through() {
        let probe = extract_validated_json(Ok(Json(Probe { amount: 5 }))).expect("should pass");

        assert_eq!(probe.amount, 5);
    }

    #[test]
    fn failing_fields_become_invalid_fields() {
        let result = extract_validated_json(Ok(Json(Probe { amount: -1 })));

        match result {
            Err(AppError::InvalidFields(fields)) => assert_eq!(
                fields,
                vec![FieldError::new(
                    "amount",
                    "the value of amount must be greater than or equal 0"
                )]
            ),
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn bound_messages() {
        assert_eq!(gt_message("amount", 0), "the value of amount must be greater than 0");
        assert_eq!(
            lte_message("amount", 100000),
            "the value of amount must be less than or equal 100000"
        );
    }
}
