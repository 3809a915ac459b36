use serde::{Deserialize, Serialize};

/// How a holder releases its lease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationMode {
    /// Remove the record entirely.
    #[default]
    Delete,
    /// Keep the record shell and clear its timing and transition fields.
    Clear,
}

impl std::fmt::Display for InvalidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidationMode::Delete => write!(f, "delete"),
            InvalidationMode::Clear => write!(f, "clear"),
        }
    }
}

/// Lease manager configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// holder-identity: node-remediation-operator
/// namespace: node-leases
/// invalidation: delete
/// request-timeout-secs: 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaseConfigFile {
    #[serde(default, alias = "holder-identity")]
    pub holder_identity: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub invalidation: Option<InvalidationMode>,
    /// `0` disables the per-call timeout.
    #[serde(default, alias = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
