//! Storage boundary for the funding ledger.
//! The ledger only talks to persistence through [`FundingStore`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AppliedContribution, CampaignSnapshot, Contribution, Donation};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The conditional wallet write did not match the observed state.
    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait FundingStore: Send + Sync {
    /// Short backend name used in health reports.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> RepositoryResult<()>;

    /// Load a campaign and its wallet as plain values.
    async fn find_campaign(&self, campaign_id: i64) -> RepositoryResult<Option<CampaignSnapshot>>;

    /// Credit the wallet and append the donation as one atomic unit.
    ///
    /// Returns [`RepositoryError::Conflict`] without writing anything when the
    /// wallet no longer holds `contribution.expected_amount` or the credit
    /// would push it past the campaign target.
    async fn try_apply(&self, contribution: &Contribution) -> RepositoryResult<AppliedContribution>;

    /// Donations for a campaign, newest first.
    async fn list_donations(
        &self,
        campaign_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Donation>>;
}
