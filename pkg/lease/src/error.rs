use pkg_state::StoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaseError {
    /// Another holder owns a valid lease, or the caller tried to release a
    /// lease it does not hold.
    #[error("can't update or invalidate lease held by different owner: {holder_identity:?}")]
    AlreadyHeld { holder_identity: String },

    #[error("invalid lease name: {0}")]
    InvalidName(String),

    #[error("lease duration {0:?} does not fit in whole i32 seconds")]
    InvalidDuration(Duration),

    #[error("invalid lease manager config: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LeaseError {
    pub fn already_held(holder_identity: &str) -> Self {
        LeaseError::AlreadyHeld {
            holder_identity: holder_identity.to_string(),
        }
    }

    /// Holder named by an `AlreadyHeld` error.
    pub fn holder_identity(&self) -> Option<&str> {
        match self {
            LeaseError::AlreadyHeld { holder_identity } => Some(holder_identity),
            _ => None,
        }
    }

    pub fn is_already_held(&self) -> bool {
        matches!(self, LeaseError::AlreadyHeld { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LeaseError::Store(e) if e.is_not_found())
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, LeaseError::Store(e) if e.is_already_exists())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LeaseError::Store(e) if e.is_conflict())
    }
}

pub type Result<T> = std::result::Result<T, LeaseError>;
