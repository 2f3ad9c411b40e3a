//! # Tax calculation routes
//!
//! | Method | Path                           | Body                         |
//! |--------|--------------------------------|------------------------------|
//! | POST   | `/tax/calculations`            | JSON [`CalculationRequest`]  |
//! | POST   | `/tax/calculations/upload-csv` | multipart, field `taxFile`   |
//!
//! Both read the deduction caps from the settings store first. The upload
//! reads them once and uses that snapshot for every row.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{AllowanceInput, AllowanceType, TaxInput, TaxLevel};
use tax_data::TaxFileLoader;
use tracing::{debug, info};

use crate::error::{AppError, FieldError};
use crate::extractors::{Validate, extract_validated_json, gte_message};
use crate::state::AppState;

/// Multipart field carrying the batch file.
pub const TAX_FILE_FIELD: &str = "taxFile";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tax/calculations", post(calculate_tax))
        .route("/tax/calculations/upload-csv", post(upload_csv))
}

// -- DTOs -----------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub total_income: Decimal,
    #[serde(default)]
    pub wht: Decimal,
    #[serde(default)]
    pub allowances: Vec<AllowanceRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRequest {
    pub allowance_type: String,
    pub amount: Decimal,
}

impl Validate for CalculationRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.total_income < Decimal::ZERO {
            errors.push(FieldError::new(
                "totalIncome",
                gte_message("totalIncome", 0),
            ));
        }
        if self.wht < Decimal::ZERO {
            errors.push(FieldError::new("wht", gte_message("wht", 0)));
        } else if self.wht > self.total_income {
            errors.push(FieldError::new(
                "wht",
                "the value of wht must be lower than or equal value of field totalIncome",
            ));
        }

        for (index, allowance) in self.allowances.iter().enumerate() {
            let amount = format!("allowances[{index}].amount");
            if allowance.amount < Decimal::ZERO {
                errors.push(FieldError::new(&amount, gte_message(&amount, 0)));
            }

            let kind = format!("allowances[{index}].allowanceType");
            match AllowanceType::parse(&allowance.allowance_type) {
                Some(AllowanceType::Donation | AllowanceType::KReceipt) => {}
                _ => errors.push(FieldError::new(
                    &kind,
                    format!("the value of {kind} must be one of donation k-receipt"),
                )),
            }
        }

        errors
    }
}

impl From<&CalculationRequest> for TaxInput {
    fn from(req: &CalculationRequest) -> Self {
        TaxInput {
            income: req.total_income,
            withholding: req.wht,
            allowances: req
                .allowances
                .iter()
                .map(|a| AllowanceInput {
                    allowance_type: a.allowance_type.clone(),
                    amount: a.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    pub tax_level: Vec<TaxLevelResponse>,
    #[serde(
        with = "rust_decimal::serde::float",
        skip_serializing_if = "Decimal::is_zero"
    )]
    pub tax_refund: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxLevelResponse {
    pub level: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
}

impl From<TaxLevel> for TaxLevelResponse {
    fn from(level: TaxLevel) -> Self {
        Self {
            level: level.level,
            tax: level.tax,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub taxes: Vec<BatchItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(
        with = "rust_decimal::serde::float",
        skip_serializing_if = "Decimal::is_zero"
    )]
    pub tax_refund: Decimal,
}

// -- Handlers -------------------------------------------------------------

async fn calculate_tax(
    State(state): State<AppState>,
    body: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let caps = state.settings.get_deduction_config().await?.caps();

    let result = state.calculator.calculate(&TaxInput::from(&req), &caps)?;
    debug!(income = %req.total_income, tax = %result.tax, refund = %result.refund, "calculation served");

    Ok(Json(CalculationResponse {
        tax: result.tax,
        tax_level: result.levels.into_iter().map(TaxLevelResponse::from).collect(),
        tax_refund: result.refund,
    }))
}

async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut contents = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(TAX_FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            contents = Some(bytes);
            break;
        }
    }
    let contents = contents
        .ok_or_else(|| AppError::BadRequest(format!("missing multipart field '{TAX_FILE_FIELD}'")))?;

    let records = TaxFileLoader::parse(&contents[..])?;
    let caps = state.settings.get_deduction_config().await?.caps();

    let mut taxes = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let result = state
            .calculator
            .calculate(&record.to_tax_input(), &caps)
            .map_err(|e| AppError::Validation(format!("row {}: {}", index + 1, e)))?;
        taxes.push(BatchItem {
            total_income: record.total_income,
            tax: result.tax,
            tax_refund: result.refund,
        });
    }

    info!(rows = taxes.len(), "tax file processed");
    Ok(Json(BatchResponse { taxes }))
}
