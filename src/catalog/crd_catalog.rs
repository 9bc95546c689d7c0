//! CRD catalog
//!
//! Maps CRD names to their resolved identities and keeps the two indexes the
//! rest of the pipeline needs: the set of known groups (the ownership filter)
//! and the reverse kind -> CRD name index (for projection).

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::resolver::resolve_crd;
use crate::error::OrderResult;
use crate::models::{CrdDefinition, ResourceIdentity};

/// Catalog of discovered CRDs, built once per run and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct CrdCatalog {
    /// CRD name -> identity
    entries: BTreeMap<String, ResourceIdentity>,
    known_groups: HashSet<String>,
    kind_to_crd_name: HashMap<String, String>,
    /// Number of CRDs skipped because their group is ignored
    ignored: usize,
}

impl CrdCatalog {
    /// Build the catalog from untyped CRD objects
    ///
    /// CRDs whose group is in `ignored_groups` are left out entirely, so their
    /// kinds never reach the known-group filter and can never act as owners.
    /// The first malformed CRD aborts the build.
    pub fn build(crds: &[Value], ignored_groups: &HashSet<String>) -> OrderResult<Self> {
        let definitions = crds
            .iter()
            .map(resolve_crd)
            .collect::<OrderResult<Vec<_>>>()?;
        Ok(Self::from_definitions(definitions, ignored_groups))
    }

    /// Build the catalog from already-resolved definitions
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CrdDefinition>,
        ignored_groups: &HashSet<String>,
    ) -> Self {
        let mut catalog = Self::default();

        for def in definitions {
            if ignored_groups.contains(&def.identity.group) {
                tracing::debug!(crd = %def.name, group = %def.identity.group, "ignoring CRD");
                catalog.ignored += 1;
                continue;
            }

            // Kinds are expected to be unique; on a clash the later CRD wins
            if let Some(previous) = catalog
                .kind_to_crd_name
                .insert(def.identity.kind.clone(), def.name.clone())
            {
                if previous != def.name {
                    tracing::warn!(
                        kind = %def.identity.kind,
                        previous = %previous,
                        current = %def.name,
                        "kind is exposed by more than one CRD, keeping the last one"
                    );
                }
            }

            catalog.known_groups.insert(def.identity.group.clone());
            catalog.entries.insert(def.name, def.identity);
        }

        tracing::info!(
            crds = catalog.entries.len(),
            groups = catalog.known_groups.len(),
            ignored = catalog.ignored,
            "built CRD catalog"
        );
        catalog
    }

    /// Identities of all catalogued resource types, ordered by CRD name
    pub fn identities(&self) -> impl Iterator<Item = &ResourceIdentity> {
        self.entries.values()
    }

    pub fn get(&self, crd_name: &str) -> Option<&ResourceIdentity> {
        self.entries.get(crd_name)
    }

    pub fn known_groups(&self) -> &HashSet<String> {
        &self.known_groups
    }

    pub fn kind_to_crd_name(&self) -> &HashMap<String, String> {
        &self.kind_to_crd_name
    }

    /// CRD name serving the given kind, if the kind was discovered
    pub fn crd_name_for_kind(&self, kind: &str) -> Option<&str> {
        self.kind_to_crd_name.get(kind).map(String::as_str)
    }

    /// All catalogued kinds
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kind_to_crd_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored
    }
}
