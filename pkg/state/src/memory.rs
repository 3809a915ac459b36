use async_trait::async_trait;
use pkg_types::lease::Lease;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::{self, LeaseStore, lease_key};

/// In-memory lease store with the same conditional-write semantics as
/// [`crate::client::StateStore`]. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryLeaseStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    leases: RwLock<HashMap<String, Lease>>,
    writes: AtomicU64,
    fail_next_write: AtomicBool,
}

impl MemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record verbatim, bypassing version checks. A zero version is
    /// bumped to `1` so the record looks persisted.
    pub async fn insert(&self, mut lease: Lease) -> Lease {
        if lease.metadata.resource_version == 0 {
            lease.metadata.resource_version = 1;
        }
        let key = lease_key(lease.namespace(), lease.name());
        self.inner.leases.write().await.insert(key, lease.clone());
        lease
    }

    /// Make the next create/update/delete fail with a backend error.
    pub fn fail_next_write(&self) {
        self.inner.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.leases.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn injected_failure(&self) -> Result<()> {
        if self.inner.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "injected lease store failure"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LeaseStore for MemoryLeaseStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Lease> {
        self.inner
            .leases
            .read()
            .await
            .get(&lease_key(namespace, name))
            .cloned()
            .ok_or_else(|| StoreError::not_found(namespace, name))
    }

    async fn create(&self, lease: &Lease) -> Result<Lease> {
        self.injected_failure()?;
        let key = lease_key(lease.namespace(), lease.name());
        let mut leases = self.inner.leases.write().await;
        let created = store::prepare_create(leases.get(&key), lease)?;
        leases.insert(key, created.clone());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn update(&self, lease: &Lease) -> Result<Lease> {
        self.injected_failure()?;
        let key = lease_key(lease.namespace(), lease.name());
        let mut leases = self.inner.leases.write().await;
        let updated = store::prepare_update(leases.get(&key), lease)?;
        leases.insert(key, updated.clone());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(updated)
    }

    async fn delete(&self, lease: &Lease) -> Result<()> {
        self.injected_failure()?;
        let key = lease_key(lease.namespace(), lease.name());
        let mut leases = self.inner.leases.write().await;
        store::check_delete(leases.get(&key), lease)?;
        leases.remove(&key);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
