use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.funding.summary(campaign_id).await?;
    Ok(Json(summary))
}

pub async fn list_donations(
    State(state): State<AppState>,
    Path(campaign_id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let donations = state
        .funding
        .donations(campaign_id, pagination.limit, pagination.offset)
        .await?;

    Ok(Json(donations))
}
