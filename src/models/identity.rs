//! Resource identity derived from a CRD

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical type identity of one custom resource type
///
/// `resource` is the plural lowercase name used for API addressing, `kind` is
/// the PascalCase name carried in owner references. They are never
/// interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub group: String,
    pub version: String,
    pub resource: String,
    pub kind: String,
    pub namespaced: bool,
}

impl ResourceIdentity {
    /// API version string as it appears in `apiVersion` fields (`group/version`)
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Fully-qualified resource name (`plural.group`), which is also the CRD name
    pub fn qualified_resource(&self) -> String {
        if self.group.is_empty() {
            self.resource.clone()
        } else {
            format!("{}.{}", self.resource, self.group)
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.version, self.resource)
    }
}

/// A resolved CRD: its definition name plus the identity it serves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrdDefinition {
    /// `metadata.name` of the CRD, e.g. `foos.bar.example.com`
    pub name: String,
    pub identity: ResourceIdentity,
}
