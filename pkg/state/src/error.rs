use std::time::Duration;
use thiserror::Error;

/// Failure of a single lease store round trip.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("lease {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("lease {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    #[error(
        "lease {namespace}/{name} was modified concurrently (expected version {expected}, found {actual})"
    )]
    Conflict {
        namespace: String,
        name: String,
        expected: u64,
        actual: u64,
    },

    #[error("lease store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("lease record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lease store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(namespace: &str, name: &str) -> Self {
        StoreError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn already_exists(namespace: &str, name: &str) -> Self {
        StoreError::AlreadyExists {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn conflict(namespace: &str, name: &str, expected: u64, actual: u64) -> Self {
        StoreError::Conflict {
            namespace: namespace.to_string(),
            name: name.to_string(),
            expected,
            actual,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
