//! In-memory persistence adapters.

mod marketplace_store;

pub use marketplace_store::InMemoryMarketplaceStore;
