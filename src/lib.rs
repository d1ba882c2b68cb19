pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod ports;
pub mod telemetry;
pub mod use_cases;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::health::{DependencyChecker, StoreChecker};
use crate::ports::FundingStore;
use crate::use_cases::{ApplyDonation, CampaignFundingQuery};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<ApplyDonation>,
    pub funding: Arc<CampaignFundingQuery>,
    pub health_checkers: Arc<Vec<Arc<dyn DependencyChecker>>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn FundingStore>, ledger_max_retries: u32) -> Self {
        let checker: Arc<dyn DependencyChecker> = Arc::new(StoreChecker::new(store.clone()));
        Self {
            ledger: Arc::new(ApplyDonation::new(store.clone()).with_max_retries(ledger_max_retries)),
            funding: Arc::new(CampaignFundingQuery::new(store)),
            health_checkers: Arc::new(vec![checker]),
            start_time: Instant::now(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/campaigns/:id", get(handlers::campaigns::get_campaign))
        .route(
            "/campaigns/:id/donations",
            post(handlers::donations::donate).get(handlers::campaigns::list_donations),
        )
        .layer(axum::middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
