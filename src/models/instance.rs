//! Live custom-resource instances
//!
//! Instances only live for the duration of one ordering computation. We keep
//! just enough of each object to build the ownership relation.

use serde::{Deserialize, Serialize};

/// Owner reference as carried in `metadata.ownerReferences`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl OwnerRef {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: String::new(),
        }
    }

    /// API group of the owner, see [`owner_group`]
    pub fn group(&self) -> Option<&str> {
        owner_group(&self.api_version)
    }
}

/// A live object of some custom resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub owner_references: Vec<OwnerRef>,
}

impl Instance {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: None,
            owner_references: Vec::new(),
        }
    }

    /// Builder-style helper to attach an owner reference
    pub fn owned_by(mut self, api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        self.owner_references.push(OwnerRef::new(api_version, kind));
        self
    }
}

/// Parse the API group out of an `apiVersion` string
///
/// The group is everything before the first `/`. Core API versions such as
/// `v1` have no group and yield `None`, as does a malformed `/v1`, so a core
/// owner can never match a known group even if the group set contains `""`.
pub fn owner_group(api_version: &str) -> Option<&str> {
    match api_version.split_once('/') {
        Some((group, _)) if !group.is_empty() => Some(group),
        _ => None,
    }
}
