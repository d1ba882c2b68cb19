//! Embedded FundingStore.
//!
//! All state sits behind one async mutex, so the check-and-credit in
//! `try_apply` is atomic with respect to every other call on the store.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::{
    AppliedContribution, CampaignSnapshot, CampaignStatus, Contribution, Donation, WalletSnapshot,
};
use crate::ports::{FundingStore, RepositoryError, RepositoryResult};

/// Campaign owner. The ledger never writes these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub user_id: i64,
    pub title: String,
    pub target_amt: BigDecimal,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone)]
struct CampaignRecord {
    campaign: NewCampaign,
    wallet_id: Option<i64>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<i64, UserRecord>,
    campaigns: HashMap<i64, CampaignRecord>,
    wallets: HashMap<i64, WalletSnapshot>,
    donations: Vec<Donation>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn snapshot(&self, campaign_id: i64) -> Option<CampaignSnapshot> {
        let record = self.campaigns.get(&campaign_id)?;
        let wallet = record
            .wallet_id
            .and_then(|wallet_id| self.wallets.get(&wallet_id))
            .cloned();

        Some(CampaignSnapshot {
            campaign_id,
            user_id: record.campaign.user_id,
            title: record.campaign.title.clone(),
            target_amt: record.campaign.target_amt.clone(),
            status: record.campaign.status,
            start_date: record.campaign.start_date,
            end_date: record.campaign.end_date,
            wallet,
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFundingStore {
    state: Mutex<State>,
}

impl InMemoryFundingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, username: &str, role: &str) -> UserRecord {
        let mut state = self.state.lock().await;
        let user = UserRecord {
            user_id: state.next_id(),
            username: username.to_string(),
            role: role.to_string(),
        };
        state.users.insert(user.user_id, user.clone());
        user
    }

    pub async fn insert_campaign(&self, campaign: NewCampaign) -> RepositoryResult<i64> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&campaign.user_id) {
            return Err(RepositoryError::NotFound(format!("user {}", campaign.user_id)));
        }

        let campaign_id = state.next_id();
        state.campaigns.insert(
            campaign_id,
            CampaignRecord {
                campaign,
                wallet_id: None,
            },
        );
        Ok(campaign_id)
    }

    /// Attach a wallet to a campaign, the way approval does.
    pub async fn open_wallet(&self, campaign_id: i64, amount: BigDecimal) -> RepositoryResult<i64> {
        let mut state = self.state.lock().await;
        let wallet_id = state.next_id();
        let record = state
            .campaigns
            .get_mut(&campaign_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("campaign {}", campaign_id)))?;

        if let Some(existing) = record.wallet_id {
            return Err(RepositoryError::Conflict(format!(
                "campaign {} already has wallet {}",
                campaign_id, existing
            )));
        }
        record.wallet_id = Some(wallet_id);

        state.wallets.insert(
            wallet_id,
            WalletSnapshot {
                wallet_id,
                cur_balance: amount.clone(),
                amount,
            },
        );
        Ok(wallet_id)
    }

    pub async fn wallet(&self, wallet_id: i64) -> Option<WalletSnapshot> {
        self.state.lock().await.wallets.get(&wallet_id).cloned()
    }

    pub async fn user(&self, user_id: i64) -> Option<UserRecord> {
        self.state.lock().await.users.get(&user_id).cloned()
    }

    pub async fn donations(&self) -> Vec<Donation> {
        self.state.lock().await.donations.clone()
    }
}

#[async_trait]
impl FundingStore for InMemoryFundingStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn find_campaign(&self, campaign_id: i64) -> RepositoryResult<Option<CampaignSnapshot>> {
        Ok(self.state.lock().await.snapshot(campaign_id))
    }

    async fn try_apply(&self, contribution: &Contribution) -> RepositoryResult<AppliedContribution> {
        let mut state = self.state.lock().await;

        let target = match state.campaigns.get(&contribution.campaign_id) {
            Some(record) if record.wallet_id == Some(contribution.wallet_id) => {
                record.campaign.target_amt.clone()
            }
            _ => {
                return Err(RepositoryError::Conflict(format!(
                    "campaign {} no longer owns wallet {}",
                    contribution.campaign_id, contribution.wallet_id
                )))
            }
        };

        let wallet = state
            .wallets
            .get(&contribution.wallet_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("wallet {}", contribution.wallet_id)))?;

        let credited = &wallet.amount + &contribution.amount;
        if wallet.amount != contribution.expected_amount || credited > target {
            return Err(RepositoryError::Conflict(format!(
                "wallet {} changed since it was read",
                contribution.wallet_id
            )));
        }

        let donation = Donation {
            donation_id: state.next_id(),
            amount: contribution.amount.clone(),
            campaign_id: contribution.campaign_id,
            wallet_id: contribution.wallet_id,
            donation_time: contribution.donation_time,
        };

        let wallet = state
            .wallets
            .get_mut(&contribution.wallet_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("wallet {}", contribution.wallet_id)))?;
        wallet.amount = credited;
        wallet.cur_balance = &wallet.cur_balance + &contribution.amount;
        let wallet = wallet.clone();

        state.donations.push(donation.clone());

        Ok(AppliedContribution { donation, wallet })
    }

    async fn list_donations(
        &self,
        campaign_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Donation>> {
        let state = self.state.lock().await;
        let mut donations: Vec<Donation> = state
            .donations
            .iter()
            .filter(|d| d.campaign_id == campaign_id)
            .cloned()
            .collect();
        donations.sort_by(|a, b| {
            b.donation_time
                .cmp(&a.donation_time)
                .then(b.donation_id.cmp(&a.donation_id))
        });

        Ok(donations
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}
