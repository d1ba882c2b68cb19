//! Donation ledger entries and the write request that produces them.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CampaignSnapshot, WalletSnapshot};

/// Decimal places held by the NUMERIC(18, 2) money columns.
pub const MONEY_SCALE: i64 = 2;

/// True when `amount` can be stored without rounding. Trailing zeros are ignored.
pub fn fits_money_scale(amount: &BigDecimal) -> bool {
    let (_, scale) = amount.as_bigint_and_exponent();
    scale <= MONEY_SCALE || amount.normalized().as_bigint_and_exponent().1 <= MONEY_SCALE
}

/// An applied contribution. Append-only: never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Donation {
    pub donation_id: i64,
    pub amount: BigDecimal,
    pub campaign_id: i64,
    pub wallet_id: i64,
    pub donation_time: DateTime<Utc>,
}

/// A validated request to credit a wallet.
///
/// `expected_amount` is the raised total observed when the contribution was
/// validated. Stores must only apply the credit if the wallet still holds
/// exactly that amount and the result stays within the campaign target.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub campaign_id: i64,
    pub wallet_id: i64,
    pub amount: BigDecimal,
    pub expected_amount: BigDecimal,
    pub donation_time: DateTime<Utc>,
}

impl Contribution {
    pub fn new(campaign: &CampaignSnapshot, wallet: &WalletSnapshot, amount: BigDecimal) -> Self {
        Self {
            campaign_id: campaign.campaign_id,
            wallet_id: wallet.wallet_id,
            amount,
            expected_amount: wallet.amount.clone(),
            donation_time: Utc::now(),
        }
    }
}

/// Result of a successful store write: the new donation and the wallet after the credit.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedContribution {
    pub donation: Donation,
    pub wallet: WalletSnapshot,
}
