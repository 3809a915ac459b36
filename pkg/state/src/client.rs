use async_trait::async_trait;
use pkg_types::lease::Lease;
use slatedb::Db;
use slatedb::object_store::local::LocalFileSystem;
use slatedb::object_store::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;
use crate::store::{self, LeaseStore, lease_key, namespace_prefix};

/// Persistent lease store backed by SlateDB on a local filesystem.
/// In production this would use S3/R2/MinIO via the `object_store` crate.
///
/// Conditional writes are a read-compare-write serialized by a mutex shared by
/// every clone of the handle, so all managers that share a handle see atomic
/// create/update/delete.
#[derive(Clone)]
pub struct StateStore {
    db: Db,
    write_lock: Arc<Mutex<()>>,
}

impl StateStore {
    /// Open (or create) a state store rooted at `path` on the local filesystem.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        info!("Opening SlateDB lease store at {}", path);

        // Ensure the data directory exists before opening the object store
        std::fs::create_dir_all(path)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory {}: {}", path, e))?;

        let object_store = Arc::new(
            LocalFileSystem::new_with_prefix(path)
                .map_err(|e| anyhow::anyhow!("Failed to create local object store: {}", e))?,
        );
        let db = Db::open(Path::from("/"), object_store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open SlateDB: {}", e))?;
        Ok(Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Store a value under the given key.
    pub async fn put(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.db
            .put(key.as_bytes(), value)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("SlateDB put failed: {}", e))
    }

    /// Retrieve the value for a key, or `None` if it does not exist.
    pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        match self.db.get(key.as_bytes()).await {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("SlateDB get failed: {}", e)),
        }
    }

    /// Delete a key from the store.
    pub async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.db
            .delete(key.as_bytes())
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("SlateDB delete failed: {}", e))
    }

    /// List all key-value pairs whose keys start with `prefix`.
    /// Returns them as `(key_string, raw_bytes)`.
    pub async fn list_prefix(&self, prefix: &str) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
        let mut results = Vec::new();
        let mut iter = self
            .db
            .scan_prefix(prefix.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB scan_prefix failed: {}", e))?;

        while let Some(kv) = iter
            .next()
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB scan failed: {}", e))?
        {
            let key = String::from_utf8_lossy(&kv.key).to_string();
            results.push((key, kv.value.to_vec()));
        }
        Ok(results)
    }

    /// All lease records in `namespace`, skipping entries that fail to decode.
    pub async fn list_leases(&self, namespace: &str) -> Result<Vec<Lease>> {
        let entries = self.list_prefix(&namespace_prefix(namespace)).await?;
        let mut leases = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match serde_json::from_slice::<Lease>(&value) {
                Ok(lease) => leases.push(lease),
                Err(e) => debug!("Skipping undecodable lease record {}: {}", key, e),
            }
        }
        Ok(leases)
    }

    /// Gracefully close the state store.
    pub async fn close(self) -> anyhow::Result<()> {
        info!("Closing SlateDB lease store");
        self.db
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB close failed: {}", e))
    }

    async fn read_lease(&self, key: &str) -> Result<Option<Lease>> {
        match self.get(key).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn write_lease(&self, key: &str, lease: &Lease) -> Result<()> {
        let data = serde_json::to_vec(lease)?;
        self.put(key, &data).await?;
        Ok(())
    }
}

#[async_trait]
impl LeaseStore for StateStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Lease> {
        self.read_lease(&lease_key(namespace, name))
            .await?
            .ok_or_else(|| crate::StoreError::not_found(namespace, name))
    }

    async fn create(&self, lease: &Lease) -> Result<Lease> {
        let key = lease_key(lease.namespace(), lease.name());
        let _guard = self.write_lock.lock().await;
        let existing = self.read_lease(&key).await?;
        let created = store::prepare_create(existing.as_ref(), lease)?;
        self.write_lease(&key, &created).await?;
        Ok(created)
    }

    async fn update(&self, lease: &Lease) -> Result<Lease> {
        let key = lease_key(lease.namespace(), lease.name());
        let _guard = self.write_lock.lock().await;
        let existing = self.read_lease(&key).await?;
        let updated = store::prepare_update(existing.as_ref(), lease)?;
        self.write_lease(&key, &updated).await?;
        Ok(updated)
    }

    async fn delete(&self, lease: &Lease) -> Result<()> {
        let key = lease_key(lease.namespace(), lease.name());
        let _guard = self.write_lock.lock().await;
        let existing = self.read_lease(&key).await?;
        store::check_delete(existing.as_ref(), lease)?;
        StateStore::delete(self, &key).await?;
        Ok(())
    }
}
