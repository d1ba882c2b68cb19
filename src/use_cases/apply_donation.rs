//! Apply donation use case.
//! Validates a contribution against the campaign target and records it through
//! the FundingStore as a single conditional write.

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{fits_money_scale, Contribution};
use crate::ports::{FundingStore, RepositoryError};

/// Input for the ApplyDonation use case. Caller authorization is checked upstream.
#[derive(Debug, Clone)]
pub struct DonationInput {
    pub campaign_id: i64,
    pub amount: BigDecimal,
}

/// Output of the ApplyDonation use case.
#[derive(Debug, Clone, Serialize)]
pub struct DonationOutput {
    pub donation_id: i64,
    pub campaign_id: i64,
    pub wallet_id: i64,
    pub amount: BigDecimal,
    pub new_balance: BigDecimal,
    pub new_amount: BigDecimal,
    pub donated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid donation amount: {0}")]
    InvalidAmount(BigDecimal),

    #[error("Campaign {0} not found")]
    CampaignNotFound(i64),

    #[error("Campaign {0} has no associated wallet")]
    NoWallet(i64),

    #[error("Donation of {requested} exceeds target amount {target} (raised {raised})")]
    TargetExceeded {
        campaign_id: i64,
        target: BigDecimal,
        raised: BigDecimal,
        requested: BigDecimal,
    },

    #[error("Wallet for campaign {0} was modified concurrently, retry the donation")]
    ConcurrencyConflict(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LedgerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::ConcurrencyConflict(_))
    }
}

/// Use case for applying donations to campaign wallets.
pub struct ApplyDonation {
    store: Arc<dyn FundingStore>,
    max_retries: u32,
}

impl ApplyDonation {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn new(store: Arc<dyn FundingStore>) -> Self {
        Self {
            store,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub async fn execute(&self, input: DonationInput) -> Result<DonationOutput, LedgerError> {
        if input.amount <= BigDecimal::zero() || !fits_money_scale(&input.amount) {
            tracing::warn!(
                campaign_id = input.campaign_id,
                amount = %input.amount,
                "Rejected donation with non-positive or sub-cent amount"
            );
            return Err(LedgerError::InvalidAmount(input.amount));
        }

        let mut retries = 0;
        loop {
            match self.attempt(&input).await {
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    retries += 1;
                    tracing::debug!(
                        campaign_id = input.campaign_id,
                        retry = retries,
                        "Wallet changed during donation, retrying"
                    );
                }
                Ok(output) => {
                    tracing::info!(
                        campaign_id = output.campaign_id,
                        donation_id = output.donation_id,
                        amount = %output.amount,
                        new_amount = %output.new_amount,
                        "Donation applied"
                    );
                    return Ok(output);
                }
                Err(e) => {
                    match &e {
                        LedgerError::Repository(inner) => tracing::error!(
                            campaign_id = input.campaign_id,
                            error = %inner,
                            "Donation failed on storage error"
                        ),
                        other => tracing::warn!(
                            campaign_id = input.campaign_id,
                            amount = %input.amount,
                            reason = %other,
                            "Donation rejected"
                        ),
                    }
                    return Err(e);
                }
            }
        }
    }

    /// One validate-and-apply pass against a fresh snapshot.
    async fn attempt(&self, input: &DonationInput) -> Result<DonationOutput, LedgerError> {
        let campaign = self
            .store
            .find_campaign(input.campaign_id)
            .await?
            .ok_or(LedgerError::CampaignNotFound(input.campaign_id))?;

        let wallet = campaign
            .wallet
            .as_ref()
            .ok_or(LedgerError::NoWallet(campaign.campaign_id))?;

        if &wallet.amount + &input.amount > campaign.target_amt {
            return Err(LedgerError::TargetExceeded {
                campaign_id: campaign.campaign_id,
                target: campaign.target_amt.clone(),
                raised: wallet.amount.clone(),
                requested: input.amount.clone(),
            });
        }

        let contribution = Contribution::new(&campaign, wallet, input.amount.clone());
        let applied = match self.store.try_apply(&contribution).await {
            Ok(applied) => applied,
            Err(RepositoryError::Conflict(_)) => {
                return Err(LedgerError::ConcurrencyConflict(campaign.campaign_id))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DonationOutput {
            donation_id: applied.donation.donation_id,
            campaign_id: applied.donation.campaign_id,
            wallet_id: applied.wallet.wallet_id,
            amount: applied.donation.amount,
            new_balance: applied.wallet.cur_balance,
            new_amount: applied.wallet.amount,
            donated_at: applied.donation.donation_time,
        })
    }
}
