use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pkg_constants::lease::{LEASE_API_VERSION, LEASE_KIND, UNSET_RESOURCE_VERSION};

/// Reference from a lease record to the object whose ownership it coordinates.
/// Ties the record's lifecycle to that object for garbage collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
    /// Optimistic concurrency token assigned by the store on every write.
    #[serde(default)]
    pub resource_version: u64,
}

/// The coordination fields of a lease. Every field is optional on the wire;
/// a record missing `renew_time` or `lease_duration_seconds` is never valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_duration_seconds: Option<i32>,
    /// Start of the holder's current unbroken ownership streak.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquire_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renew_time: Option<DateTime<Utc>>,
    /// Number of holder takeovers. Renewals never touch it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_transitions: Option<i32>,
}

/// A persisted lease record, shaped like a `coordination.k8s.io/v1` Lease.
/// Stored at `/registry/leases/<namespace>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: LeaseSpec,
}

impl Lease {
    /// A fresh, never-persisted record with a single owner reference.
    pub fn new(namespace: &str, name: &str, owner: OwnerReference, spec: LeaseSpec) -> Self {
        Self {
            api_version: LEASE_API_VERSION.to_string(),
            kind: LEASE_KIND.to_string(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
                owner_references: vec![owner],
                resource_version: UNSET_RESOURCE_VERSION,
            },
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn resource_version(&self) -> u64 {
        self.metadata.resource_version
    }

    pub fn holder_identity(&self) -> Option<&str> {
        self.spec.holder_identity.as_deref()
    }

    /// Whether `identity` is the recorded holder.
    pub fn is_held_by(&self, identity: &str) -> bool {
        self.holder_identity() == Some(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn owner() -> OwnerReference {
        OwnerReference {
            api_version: "v1".to_string(),
            kind: "Node".to_string(),
            name: "miau".to_string(),
            uid: "foobar".to_string(),
        }
    }

    #[test]
    fn new_lease_has_kind_and_single_owner() {
        let lease = Lease::new("node-leases", "node-miau", owner(), LeaseSpec::default());
        assert_eq!(lease.api_version, "coordination.k8s.io/v1");
        assert_eq!(lease.kind, "Lease");
        assert_eq!(lease.metadata.owner_references, vec![owner()]);
        assert_eq!(lease.resource_version(), 0);
        assert!(!lease.is_held_by("anyone"));
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let spec = LeaseSpec {
            holder_identity: Some("some-operator".to_string()),
            lease_duration_seconds: Some(3600),
            renew_time: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..Default::default()
        };
        let lease = Lease::new("node-leases", "node-miau", owner(), spec);
        let json = serde_json::to_value(&lease).unwrap();

        assert_eq!(json["apiVersion"], "coordination.k8s.io/v1");
        assert_eq!(json["metadata"]["ownerReferences"][0]["apiVersion"], "v1");
        assert_eq!(json["spec"]["holderIdentity"], "some-operator");
        assert_eq!(json["spec"]["leaseDurationSeconds"], 3600);
        assert!(json["spec"].get("acquireTime").is_none());
        assert!(json["spec"].get("leaseTransitions").is_none());
    }

    #[test]
    fn keeps_microsecond_timestamps() {
        let t = Utc.timestamp_micros(1_700_000_000_123_456).unwrap();
        let spec = LeaseSpec {
            renew_time: Some(t),
            ..Default::default()
        };
        let lease = Lease::new("ns", "node-a", owner(), spec);
        let data = serde_json::to_vec(&lease).unwrap();
        let back: Lease = serde_json::from_slice(&data).unwrap();
        assert_eq!(back.spec.renew_time, Some(t));
    }
}
