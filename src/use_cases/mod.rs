pub mod apply_donation;
pub mod campaign_funding;

pub use apply_donation::{ApplyDonation, DonationInput, DonationOutput, LedgerError};
pub use campaign_funding::{CampaignFunding, CampaignFundingQuery};
