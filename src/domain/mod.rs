//! Domain records for the funding ledger.
//!
//! Everything here is a plain value. Records handed out by a store are
//! snapshots: mutating one never reaches the database.

mod campaign;
mod donation;

pub use campaign::{CampaignSnapshot, CampaignStatus, ParseStatusError, WalletSnapshot};
pub use donation::{fits_money_scale, AppliedContribution, Contribution, Donation, MONEY_SCALE};
