use async_trait::async_trait;
use pkg_constants::lease::{LEASE_KEY_PREFIX, UNSET_RESOURCE_VERSION};
use pkg_types::lease::Lease;

use crate::error::{Result, StoreError};

/// Conditional create / read / update / delete of lease records keyed by
/// `(namespace, name)`.
///
/// Implementations must make `create` atomic (exactly one concurrent creator
/// succeeds) and reject an `update` or `delete` whose `resource_version` no
/// longer matches the stored record.
#[async_trait]
pub trait LeaseStore: Send + Sync {
    async fn get(&self, namespace: &str, name: &str) -> Result<Lease>;

    /// Persist a record that must not exist yet. Returns it with its new version.
    async fn create(&self, lease: &Lease) -> Result<Lease>;

    /// Replace a record, provided nobody changed it since it was read.
    async fn update(&self, lease: &Lease) -> Result<Lease>;

    /// Remove a record. A non-zero `resource_version` acts as a precondition.
    async fn delete(&self, lease: &Lease) -> Result<()>;
}

/// etcd-style key of a lease record.
pub fn lease_key(namespace: &str, name: &str) -> String {
    format!("{}{}/{}", LEASE_KEY_PREFIX, namespace, name)
}

/// Key prefix covering every lease in `namespace`.
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}{}/", LEASE_KEY_PREFIX, namespace)
}

/// Stamp the first version onto a record that is about to be created.
pub(crate) fn prepare_create(existing: Option<&Lease>, lease: &Lease) -> Result<Lease> {
    if existing.is_some() {
        return Err(StoreError::already_exists(lease.namespace(), lease.name()));
    }
    let mut created = lease.clone();
    created.metadata.resource_version = 1;
    Ok(created)
}

/// Check the caller's version against the stored record and bump it.
pub(crate) fn prepare_update(existing: Option<&Lease>, lease: &Lease) -> Result<Lease> {
    let current = existing.ok_or_else(|| StoreError::not_found(lease.namespace(), lease.name()))?;
    check_version(current, lease)?;
    let mut updated = lease.clone();
    updated.metadata.resource_version = current.resource_version() + 1;
    Ok(updated)
}

pub(crate) fn check_delete(existing: Option<&Lease>, lease: &Lease) -> Result<()> {
    let current = existing.ok_or_else(|| StoreError::not_found(lease.namespace(), lease.name()))?;
    if lease.resource_version() == UNSET_RESOURCE_VERSION {
        return Ok(());
    }
    check_version(current, lease)
}

fn check_version(current: &Lease, lease: &Lease) -> Result<()> {
    if current.resource_version() != lease.resource_version() {
        return Err(StoreError::conflict(
            lease.namespace(),
            lease.name(),
            lease.resource_version(),
            current.resource_version(),
        ));
    }
    Ok(())
}
