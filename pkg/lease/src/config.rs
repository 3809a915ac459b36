use pkg_constants::lease::{DEFAULT_LEASE_NAMESPACE, DEFAULT_REQUEST_TIMEOUT_SECS};
use pkg_types::config::{InvalidationMode, LeaseConfigFile, load_config_file};
use pkg_types::validate::validate_namespace;
use std::time::Duration;

use crate::error::{LeaseError, Result};

/// Immutable settings of a [`crate::LeaseManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseManagerConfig {
    /// Identity written into every lease this manager acquires.
    pub holder_identity: String,
    /// Namespace that scopes every lease record.
    pub namespace: String,
    pub invalidation: InvalidationMode,
    /// Bound on each store round trip. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl LeaseManagerConfig {
    /// Defaults for everything but the holder identity.
    pub fn new(holder_identity: &str) -> Self {
        Self {
            holder_identity: holder_identity.to_string(),
            namespace: DEFAULT_LEASE_NAMESPACE.to_string(),
            invalidation: InvalidationMode::default(),
            request_timeout: timeout_from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn with_invalidation(mut self, mode: InvalidationMode) -> Self {
        self.invalidation = mode;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build from a parsed config file, filling unset keys with defaults.
    pub fn from_file(file: LeaseConfigFile) -> Result<Self> {
        let holder = file
            .holder_identity
            .ok_or_else(|| LeaseError::Config("holder-identity is required".to_string()))?;
        let mut config = Self::new(&holder);
        if let Some(ns) = file.namespace {
            config.namespace = ns;
        }
        if let Some(mode) = file.invalidation {
            config.invalidation = mode;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = timeout_from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: &str) -> Result<Self> {
        let file: LeaseConfigFile =
            load_config_file(path).map_err(|e| LeaseError::Config(format!("{}: {}", path, e)))?;
        Self::from_file(file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.holder_identity.trim().is_empty() {
            return Err(LeaseError::Config(
                "holder-identity must not be empty".to_string(),
            ));
        }
        validate_namespace(&self.namespace).map_err(|e| LeaseError::Config(e.to_string()))
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = LeaseManagerConfig::new("some-operator");
        assert_eq!(cfg.namespace, "node-leases");
        assert_eq!(cfg.invalidation, InvalidationMode::Delete);
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(10)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let file = LeaseConfigFile {
            holder_identity: Some("some-operator".to_string()),
            namespace: Some("medik8s-leases".to_string()),
            invalidation: Some(InvalidationMode::Clear),
            request_timeout_secs: Some(0),
        };
        let cfg = LeaseManagerConfig::from_file(file).unwrap();
        assert_eq!(cfg.namespace, "medik8s-leases");
        assert_eq!(cfg.invalidation, InvalidationMode::Clear);
        assert_eq!(cfg.request_timeout, None);
    }

    #[test]
    fn test_rejects_missing_or_blank_holder() {
        let err = LeaseManagerConfig::from_file(LeaseConfigFile::default()).unwrap_err();
        assert!(matches!(err, LeaseError::Config(_)));

        let file = LeaseConfigFile {
            holder_identity: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(LeaseManagerConfig::from_file(file).is_err());
    }

    #[test]
    fn test_rejects_invalid_namespace() {
        let cfg = LeaseManagerConfig::new("some-operator").with_namespace("Bad_NS");
        assert!(matches!(cfg.validate(), Err(LeaseError::Config(_))));
    }

    #[test]
    fn test_load_from_yaml() {
        let path = std::env::temp_dir().join(format!(
            "leasekeeper-manager-{}.yaml",
            chrono::Utc::now().timestamp_micros()
        ));
        std::fs::write(&path, "holder-identity: yaml-holder\nrequest-timeout-secs: 2\n").unwrap();
        let cfg = LeaseManagerConfig::load(path.to_str().unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.holder_identity, "yaml-holder");
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(2)));
    }
}
