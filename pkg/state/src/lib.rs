//! Lease record store: the `LeaseStore` contract and its backends.

pub mod client;
pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use store::LeaseStore;
