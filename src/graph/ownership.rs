//! Ownership graph builder
//!
//! Collapses the owner references of every instance into a kind-level
//! relation: owned kind -> set of distinct owning kinds. Only owners whose
//! API group belongs to a catalogued CRD are recorded.

use std::collections::{HashMap, HashSet};

use crate::models::Instance;

/// Owned kind -> distinct owning kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipMap {
    edges: HashMap<String, HashSet<String>>,
}

impl OwnershipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from instances, keeping owners in `known_groups` only
    ///
    /// Instances without owner references, or whose owners all fall outside
    /// the known groups, contribute nothing.
    pub fn build<'a>(
        instances: impl IntoIterator<Item = &'a Instance>,
        known_groups: &HashSet<String>,
    ) -> Self {
        let mut map = Self::new();
        let mut skipped = 0usize;

        for instance in instances {
            for owner in &instance.owner_references {
                match owner.group() {
                    Some(group) if known_groups.contains(group) => {
                        map.insert_edge(&instance.kind, &owner.kind);
                    }
                    _ => skipped += 1,
                }
            }
        }

        tracing::debug!(
            owned_kinds = map.len(),
            skipped_references = skipped,
            "built ownership map"
        );
        map
    }

    /// Record that `owned` can be owned by `owner`; duplicates collapse
    pub fn insert_edge(&mut self, owned: &str, owner: &str) {
        self.edges
            .entry(owned.to_string())
            .or_default()
            .insert(owner.to_string());
    }

    /// Make sure `kind` is present as an owned key, with no owners if new
    pub fn insert_root(&mut self, kind: &str) {
        self.edges.entry(kind.to_string()).or_default();
    }

    pub fn owners_of(&self, kind: &str) -> Option<&HashSet<String>> {
        self.edges.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.edges.contains_key(kind)
    }

    /// Owned kinds, in map enumeration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.edges.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<K, O, S> FromIterator<(K, O)> for OwnershipMap
where
    K: Into<String>,
    O: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, O)>>(iter: I) -> Self {
        let edges = iter
            .into_iter()
            .map(|(owned, owners)| (owned.into(), owners.into_iter().map(Into::into).collect()))
            .collect();
        Self { edges }
    }
}
