use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::ports::RepositoryError;
use crate::use_cases::LedgerError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(_)
            | LedgerError::NoWallet(_)
            | LedgerError::TargetExceeded { .. } => AppError::BadRequest(err.to_string()),
            LedgerError::CampaignNotFound(_) => AppError::NotFound(err.to_string()),
            LedgerError::ConcurrencyConflict(_) => AppError::Conflict(err.to_string()),
            LedgerError::Repository(inner) => AppError::Database(inner),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_validation_error_status_code() {
        let error = AppError::Validation("Invalid input".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status_code() {
        let error = AppError::NotFound("Resource not found".to_string());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_status_code() {
        let error = AppError::Database(RepositoryError::Database(sqlx::Error::RowNotFound));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ledger_rejections_map_to_bad_request() {
        let invalid: AppError = LedgerError::InvalidAmount(BigDecimal::from(0)).into();
        let no_wallet: AppError = LedgerError::NoWallet(3).into();
        let exceeded: AppError = LedgerError::TargetExceeded {
            campaign_id: 3,
            target: BigDecimal::from(500),
            raised: BigDecimal::from(450),
            requested: BigDecimal::from(100),
        }
        .into();

        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(no_wallet.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(exceeded.status_code(), StatusCode::BAD_REQUEST);
        assert!(exceeded.to_string().contains("exceeds target amount"));
    }

    #[test]
    fn test_missing_campaign_maps_to_not_found() {
        let error: AppError = LedgerError::CampaignNotFound(9).into();
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_concurrency_conflict_maps_to_conflict() {
        let error: AppError = LedgerError::ConcurrencyConflict(9).into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_storage_failure_maps_to_internal() {
        let error: AppError =
            LedgerError::Repository(RepositoryError::InvalidData("bad status".to_string())).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let error: AppError = ValidationError::new("amount", "must be a decimal number").into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_error_response() {
        let error = AppError::NotFound("Campaign 4 not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
