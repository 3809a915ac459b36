//! Ownership policy: pure decisions over a lease record and an instant.
//!
//! Nothing here touches the store or the clock; the manager feeds in the
//! record it read and the instant it sampled, then applies the verdict.

use chrono::{DateTime, Duration, Utc};
use pkg_types::lease::{Lease, LeaseSpec, OwnerReference};

/// What a holder should do with a record that names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseAction {
    /// Comfortably valid; write nothing.
    Keep,
    /// Refresh `renew_time` and the duration only.
    Renew,
    /// Renew and also restart the ownership streak: fresh `acquire_time`
    /// and one more transition.
    Reacquire,
}

/// Verdict on a record that names some other holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignLease {
    /// The other holder's claim is still valid.
    Held(String),
    /// The claim lapsed (or was never complete) and may be taken over.
    Takeover,
}

/// `renew_time + lease_duration_seconds`, when both are present and the sum
/// is representable. An unrepresentable due time counts as missing.
pub fn due_time(spec: &LeaseSpec) -> Option<DateTime<Utc>> {
    let renew = spec.renew_time?;
    let secs = spec.lease_duration_seconds?;
    renew.checked_add_signed(Duration::seconds(i64::from(secs)))
}

/// A lease is valid at `now` if its due time is not in the past and its renew
/// time is not in the future.
pub fn is_valid(spec: &LeaseSpec, now: DateTime<Utc>) -> bool {
    match (spec.renew_time, due_time(spec)) {
        (Some(renew), Some(due)) => due >= now && renew <= now,
        _ => false,
    }
}

/// Decide how a holder refreshes a record it already owns.
///
/// `requested` is the duration the caller is asking for; a lease due before
/// `now + requested` is renewed ahead of expiry.
pub fn owned_lease_action(spec: &LeaseSpec, now: DateTime<Utc>, requested: Duration) -> LeaseAction {
    let Some(due) = due_time(spec) else {
        return LeaseAction::Reacquire;
    };

    if due < now {
        // Expired: an existing acquire time survives the gap.
        return if spec.acquire_time.is_none() {
            LeaseAction::Reacquire
        } else {
            LeaseAction::Renew
        };
    }

    // A deadline past the end of time is later than any due time.
    let renew_before = now.checked_add_signed(requested);
    if renew_before.is_none_or(|deadline| due < deadline) {
        LeaseAction::Renew
    } else {
        LeaseAction::Keep
    }
}

/// Decide whether a record naming another holder can be taken over.
pub fn foreign_lease_action(spec: &LeaseSpec, now: DateTime<Utc>) -> ForeignLease {
    if is_valid(spec, now) {
        ForeignLease::Held(spec.holder_identity.clone().unwrap_or_default())
    } else {
        ForeignLease::Takeover
    }
}

/// Mutate `lease` for a `Renew` or `Reacquire` verdict. `Keep` is a no-op.
pub fn apply(
    lease: &mut Lease,
    action: LeaseAction,
    holder: &str,
    owner: OwnerReference,
    now: DateTime<Utc>,
    duration_secs: i32,
) {
    if action == LeaseAction::Keep {
        return;
    }
    if action == LeaseAction::Reacquire {
        lease.spec.acquire_time = Some(now);
        lease.spec.lease_transitions = Some(lease.spec.lease_transitions.unwrap_or(0) + 1);
    }
    lease.metadata.owner_references = vec![owner];
    lease.spec.holder_identity = Some(holder.to_string());
    lease.spec.lease_duration_seconds = Some(duration_secs);
    lease.spec.renew_time = Some(now);
}
