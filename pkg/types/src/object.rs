use serde::{Deserialize, Serialize};

use crate::lease::OwnerReference;

/// An object whose exclusive handling is coordinated through a lease.
///
/// One lease record exists per guarded object. Its name is derived from the
/// object's kind and name, so a node and a pod with the same name do not collide.
pub trait GuardedObject {
    fn api_version(&self) -> &str;
    fn kind(&self) -> &str;
    fn name(&self) -> &str;
    fn uid(&self) -> &str;

    /// Name of the lease record for this object, e.g. `node-worker-1`.
    fn lease_name(&self) -> String {
        format!("{}-{}", self.kind().to_lowercase(), self.name())
    }

    /// Owner reference that links the lease record back to this object.
    fn owner_reference(&self) -> OwnerReference {
        OwnerReference {
            api_version: self.api_version().to_string(),
            kind: self.kind().to_string(),
            name: self.name().to_string(),
            uid: self.uid().to_string(),
        }
    }
}

/// Plain identity of a guarded object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
}

impl ObjectRef {
    pub fn new(api_version: &str, kind: &str, name: &str, uid: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            uid: uid.to_string(),
        }
    }

    /// A core `v1` Node.
    pub fn node(name: &str, uid: &str) -> Self {
        Self::new("v1", "Node", name, uid)
    }

    /// A core `v1` Pod.
    pub fn pod(name: &str, uid: &str) -> Self {
        Self::new("v1", "Pod", name, uid)
    }
}

impl GuardedObject for ObjectRef {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn uid(&self) -> &str {
        &self.uid
    }
}
