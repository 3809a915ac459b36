//! Lease coordination for guarded objects.
//!
//! A [`LeaseManager`] grants its holder a time-bounded, exclusive claim on a
//! guarded object by reading and conditionally writing a single lease record
//! in a shared [`pkg_state::LeaseStore`]. Callers renew by calling
//! [`LeaseManager::request_lease`] again before the lease falls due.

pub mod clock;
pub mod config;
pub mod error;
pub mod manager;
pub mod policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LeaseManagerConfig;
pub use error::LeaseError;
pub use manager::LeaseManager;
