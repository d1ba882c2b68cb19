//! Read-only funding views over a campaign.

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::{CampaignStatus, Donation};
use crate::ports::FundingStore;
use crate::use_cases::LedgerError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignFunding {
    pub campaign_id: i64,
    pub title: String,
    pub status: CampaignStatus,
    pub target_amt: BigDecimal,
    pub wallet_id: Option<i64>,
    pub raised: Option<BigDecimal>,
    pub cur_balance: Option<BigDecimal>,
    pub remaining: BigDecimal,
}

pub struct CampaignFundingQuery {
    store: Arc<dyn FundingStore>,
}

impl CampaignFundingQuery {
    pub fn new(store: Arc<dyn FundingStore>) -> Self {
        Self { store }
    }

    pub async fn summary(&self, campaign_id: i64) -> Result<CampaignFunding, LedgerError> {
        let campaign = self
            .store
            .find_campaign(campaign_id)
            .await?
            .ok_or(LedgerError::CampaignNotFound(campaign_id))?;

        let remaining = campaign.remaining();
        let wallet = campaign.wallet;

        Ok(CampaignFunding {
            campaign_id: campaign.campaign_id,
            title: campaign.title,
            status: campaign.status,
            target_amt: campaign.target_amt,
            wallet_id: wallet.as_ref().map(|w| w.wallet_id),
            raised: wallet.as_ref().map(|w| w.amount.clone()),
            cur_balance: wallet.map(|w| w.cur_balance),
            remaining,
        })
    }

    /// Donation history, newest first.
    pub async fn donations(
        &self,
        campaign_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Donation>, LedgerError> {
        if self.store.find_campaign(campaign_id).await?.is_none() {
            return Err(LedgerError::CampaignNotFound(campaign_id));
        }

        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);

        Ok(self.store.list_donations(campaign_id, limit, offset).await?)
    }
}
