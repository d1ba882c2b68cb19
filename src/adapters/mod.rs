//! Implementations of the [`FundingStore`](crate::ports::FundingStore) port.

mod in_memory_funding_store;
mod postgres_funding_store;

pub use in_memory_funding_store::{InMemoryFundingStore, NewCampaign, UserRecord};
pub use postgres_funding_store::PostgresFundingStore;
