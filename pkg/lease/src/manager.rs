use chrono::{DateTime, Utc};
use pkg_state::{LeaseStore, StoreError};
use pkg_types::config::InvalidationMode;
use pkg_types::lease::{Lease, LeaseSpec};
use pkg_types::object::GuardedObject;
use pkg_types::validate::validate_lease_name;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LeaseManagerConfig;
use crate::error::{LeaseError, Result};
use crate::policy::{self, ForeignLease, LeaseAction};

/// Grants, renews, takes over and releases leases on guarded objects.
///
/// Every call is one read plus at most one conditional write against the
/// store. The manager keeps no state between calls and never retries; a caller
/// that loses a race simply calls again and the current record is re-evaluated.
/// Nothing renews in the background: callers must invoke
/// [`LeaseManager::request_lease`] again before the lease falls due.
pub struct LeaseManager {
    config: LeaseManagerConfig,
    store: Arc<dyn LeaseStore>,
    clock: Arc<dyn Clock>,
}

impl LeaseManager {
    pub fn new(config: LeaseManagerConfig, store: Arc<dyn LeaseStore>) -> Result<Self> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: LeaseManagerConfig,
        store: Arc<dyn LeaseStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            clock,
        })
    }

    pub fn holder_identity(&self) -> &str {
        &self.config.holder_identity
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Name of the lease record that guards `obj`.
    pub fn lease_name_for<O: GuardedObject + ?Sized>(&self, obj: &O) -> Result<String> {
        let name = obj.lease_name();
        validate_lease_name(&name).map_err(|e| LeaseError::InvalidName(e.to_string()))?;
        Ok(name)
    }

    /// Create the lease for `obj`, or extend it to `duration`.
    ///
    /// Fails with [`LeaseError::AlreadyHeld`] while another holder has a valid
    /// claim. Store errors on the write path are returned unchanged.
    pub async fn request_lease<O: GuardedObject + ?Sized>(
        &self,
        obj: &O,
        duration: Duration,
    ) -> Result<()> {
        let name = self.lease_name_for(obj)?;
        let duration_secs =
            i32::try_from(duration.as_secs()).map_err(|_| LeaseError::InvalidDuration(duration))?;
        let requested =
            chrono::Duration::from_std(duration).map_err(|_| LeaseError::InvalidDuration(duration))?;

        let fetched = self.call(self.store.get(self.namespace(), &name)).await;
        let now = self.clock.now();
        let mut lease = match fetched {
            Ok(lease) => lease,
            Err(e) if e.is_not_found() => {
                return self.create_lease(obj, &name, duration_secs, now).await;
            }
            Err(e) => {
                error!("Couldn't fetch lease {}/{}: {}", self.namespace(), name, e);
                return Err(e);
            }
        };

        let holder = self.holder_identity();
        let action = if lease.is_held_by(holder) {
            let action = policy::owned_lease_action(&lease.spec, now, requested);
            match action {
                LeaseAction::Keep => {
                    debug!("Lease {}/{} held by {} is still valid", self.namespace(), name, holder);
                }
                LeaseAction::Renew | LeaseAction::Reacquire => {
                    info!(
                        "Renewing lease {}/{} owned by {} (reacquire={})",
                        self.namespace(),
                        name,
                        holder,
                        action == LeaseAction::Reacquire
                    );
                }
            }
            action
        } else {
            match policy::foreign_lease_action(&lease.spec, now) {
                ForeignLease::Held(current) => {
                    warn!(
                        "Can't acquire lease {}/{}: valid lease held by {:?}",
                        self.namespace(),
                        name,
                        current
                    );
                    return Err(LeaseError::AlreadyHeld {
                        holder_identity: current,
                    });
                }
                ForeignLease::Takeover => {
                    info!(
                        "Taking over lease {}/{} from {:?} for {}",
                        self.namespace(),
                        name,
                        lease.holder_identity().unwrap_or_default(),
                        holder
                    );
                    LeaseAction::Reacquire
                }
            }
        };

        if action == LeaseAction::Keep {
            return Ok(());
        }

        policy::apply(
            &mut lease,
            action,
            holder,
            obj.owner_reference(),
            now,
            duration_secs,
        );
        if let Err(e) = self.call(self.store.update(&lease)).await {
            error!("Failed to update lease {}/{}: {}", self.namespace(), name, e);
            return Err(e);
        }
        Ok(())
    }

    /// Release the lease on `obj`. Releasing a missing lease succeeds.
    pub async fn invalidate_lease<O: GuardedObject + ?Sized>(&self, obj: &O) -> Result<()> {
        let name = self.lease_name_for(obj)?;
        info!("Invalidating lease {}/{}", self.namespace(), name);

        let mut lease = match self.call(self.store.get(self.namespace(), &name)).await {
            Ok(lease) => lease,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => {
                error!("Failed to fetch lease {}/{} to be invalidated: {}", self.namespace(), name, e);
                return Err(e);
            }
        };

        if !lease.is_held_by(self.holder_identity()) {
            let current = lease.holder_identity().unwrap_or_default();
            warn!(
                "Can't invalidate lease {}/{}: held by {:?}, not {}",
                self.namespace(),
                name,
                current,
                self.holder_identity()
            );
            return Err(LeaseError::already_held(current));
        }

        let result = match self.config.invalidation {
            InvalidationMode::Delete => match self.call(self.store.delete(&lease)).await {
                Err(e) if e.is_not_found() => Ok(()),
                other => other,
            },
            InvalidationMode::Clear => {
                clear_timing(&mut lease.spec);
                self.call(self.store.update(&lease)).await.map(|_| ())
            }
        };
        if let Err(ref e) = result {
            error!(
                "Failed to {} lease {}/{}: {}",
                self.config.invalidation,
                self.namespace(),
                name,
                e
            );
        }
        result
    }

    /// Read the lease on `obj` as stored. No policy is applied.
    pub async fn get_lease<O: GuardedObject + ?Sized>(&self, obj: &O) -> Result<Lease> {
        let name = self.lease_name_for(obj)?;
        self.call(self.store.get(self.namespace(), &name)).await
    }

    async fn create_lease<O: GuardedObject + ?Sized>(
        &self,
        obj: &O,
        name: &str,
        duration_secs: i32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let spec = LeaseSpec {
            holder_identity: Some(self.holder_identity().to_string()),
            lease_duration_seconds: Some(duration_secs),
            acquire_time: Some(now),
            renew_time: Some(now),
            lease_transitions: Some(0),
        };
        let lease = Lease::new(self.namespace(), name, obj.owner_reference(), spec);

        if let Err(e) = self.call(self.store.create(&lease)).await {
            error!("Failed to create lease {}/{}: {}", self.namespace(), name, e);
            return Err(e);
        }
        info!(
            "Created lease {}/{} for {} ({}s)",
            self.namespace(),
            name,
            self.holder_identity(),
            duration_secs
        );
        Ok(())
    }

    /// Run one store round trip, bounded by the configured timeout.
    async fn call<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StoreError::Timeout(limit))?
                .map_err(LeaseError::from),
            None => fut.await.map_err(LeaseError::from),
        }
    }
}

fn clear_timing(spec: &mut LeaseSpec) {
    spec.acquire_time = None;
    spec.renew_time = None;
    spec.lease_duration_seconds = None;
    spec.lease_transitions = None;
}
