//! Campaign and wallet snapshots as seen by the ledger.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a campaign. Transitions are owned by the admin workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Pending,
    Active,
    Completed,
    Rejected,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown campaign status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for CampaignStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(CampaignStatus::Pending),
            "active" => Ok(CampaignStatus::Active),
            "completed" => Ok(CampaignStatus::Completed),
            "rejected" => Ok(CampaignStatus::Rejected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Wallet balances at the time the snapshot was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletSnapshot {
    pub wallet_id: i64,
    /// Total raised so far. Bounded by the campaign target.
    pub amount: BigDecimal,
    pub cur_balance: BigDecimal,
}

/// Read-only view of a campaign together with its wallet, if it has one yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSnapshot {
    pub campaign_id: i64,
    pub user_id: i64,
    pub title: String,
    pub target_amt: BigDecimal,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub wallet: Option<WalletSnapshot>,
}

impl CampaignSnapshot {
    /// How much more the wallet can take before hitting the target.
    pub fn remaining(&self) -> BigDecimal {
        match &self.wallet {
            Some(wallet) => &self.target_amt - &wallet.amount,
            None => self.target_amt.clone(),
        }
    }
}
