//! # Admin deduction routes
//!
//! Mounted behind Basic authentication. Each route validates the new cap,
//! writes it to the settings store and echoes the stored value.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{
    MAX_K_RECEIPT_CAP, MAX_PERSONAL_CAP, MIN_PERSONAL_CAP, k_receipt_cap_in_range,
    personal_cap_in_range,
};
use tracing::info;

use crate::error::{AppError, FieldError};
use crate::extractors::{extract_json, gt_message, gte_message, lte_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/deductions/personal", post(update_personal))
        .route("/admin/deductions/k-receipt", post(update_k_receipt))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeductionRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDeductionResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub personal_deduction: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KReceiptDeductionResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub k_receipt: Decimal,
}

/// Field error for an out-of-range personal cap, if any.
pub fn check_personal_amount(amount: Decimal) -> Option<FieldError> {
    if personal_cap_in_range(amount) {
        return None;
    }
    let message = if amount < MIN_PERSONAL_CAP {
        gte_message("amount", MIN_PERSONAL_CAP)
    } else {
        lte_message("amount", MAX_PERSONAL_CAP)
    };
    Some(FieldError::new("amount", message))
}

/// Field error for an out-of-range k-receipt cap, if any.
pub fn check_k_receipt_amount(amount: Decimal) -> Option<FieldError> {
    if k_receipt_cap_in_range(amount) {
        return None;
    }
    let message = if amount <= Decimal::ZERO {
        gt_message("amount", 0)
    } else {
        lte_message("amount", MAX_K_RECEIPT_CAP)
    };
    Some(FieldError::new("amount", message))
}

async fn update_personal(
    State(state): State<AppState>,
    body: Result<Json<DeductionRequest>, JsonRejection>,
) -> Result<Json<PersonalDeductionResponse>, AppError> {
    let req = extract_json(body)?;
    if let Some(error) = check_personal_amount(req.amount) {
        return Err(AppError::InvalidFields(vec![error]));
    }

    let config = state.settings.update_personal_deduction(req.amount).await?;
    info!(personal = %config.personal, "admin set personal deduction");

    Ok(Json(PersonalDeductionResponse {
        personal_deduction: config.personal,
    }))
}

async fn update_k_receipt(
    State(state): State<AppState>,
    body: Result<Json<DeductionRequest>, JsonRejection>,
) -> Result<Json<KReceiptDeductionResponse>, AppError> {
    let req = extract_json(body)?;
    if let Some(error) = check_k_receipt_amount(req.amount) {
        return Err(AppError::InvalidFields(vec![error]));
    }

    let config = state.settings.update_k_receipt_deduction(req.amount).await?;
    info!(k_receipt = %config.k_receipt, "admin set k-receipt deduction");

    Ok(Json(KReceiptDeductionResponse {
        k_receipt: config.k_receipt,
    }))
}
