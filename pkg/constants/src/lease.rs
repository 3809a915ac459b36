//! Lease record / lease store constants.

/// `apiVersion` written on every persisted lease record.
pub const LEASE_API_VERSION: &str = "coordination.k8s.io/v1";

/// `kind` written on every persisted lease record.
pub const LEASE_KIND: &str = "Lease";

/// Namespace used when the configuration does not name one.
pub const DEFAULT_LEASE_NAMESPACE: &str = "node-leases";

/// etcd-style key prefix for lease records.
/// Full key = `LEASE_KEY_PREFIX + <namespace> + "/" + <name>`.
pub const LEASE_KEY_PREFIX: &str = "/registry/leases/";

/// Resource version of a record that has never been persisted.
pub const UNSET_RESOURCE_VERSION: u64 = 0;

/// Upper bound on a single store round trip when the config does not set one.
/// `0` disables the bound.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
