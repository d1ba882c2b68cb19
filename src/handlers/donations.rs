use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::use_cases::DonationInput;
use crate::validation::{parse_amount, AmountInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DonateRequest {
    pub amount: AmountInput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DonateResponse {
    pub donation_id: i64,
    pub campaign_id: i64,
    pub amount: BigDecimal,
    pub new_balance: BigDecimal,
    pub new_amount: BigDecimal,
    pub donated_at: DateTime<Utc>,
    pub message: String,
}

pub async fn donate(
    State(state): State<AppState>,
    Path(campaign_id): Path<i64>,
    Json(payload): Json<DonateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let amount = parse_amount(&payload.amount)?;

    let output = state
        .ledger
        .execute(DonationInput {
            campaign_id,
            amount,
        })
        .await?;

    let body = DonateResponse {
        donation_id: output.donation_id,
        campaign_id: output.campaign_id,
        message: format!("Successfully donated {}", output.amount),
        amount: output.amount,
        new_balance: output.new_balance,
        new_amount: output.new_amount,
        donated_at: output.donated_at,
    };

    Ok((StatusCode::CREATED, Json(body)))
}
