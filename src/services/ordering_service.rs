//! Restore order service
//!
//! Runs the whole pipeline against a [`ClusterSource`]: list CRDs, build the
//! catalog, enumerate instances, build the ownership map, order and project.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::catalog::CrdCatalog;
use crate::config::Config;
use crate::discovery::{TypeFailure, enumerate_instances};
use crate::error::{OrderError, OrderResult};
use crate::graph::{OrderingOptions, OwnershipMap, order_kinds, project};
use crate::kube::ClusterSource;

/// Inputs that shape a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOrderOptions {
    /// CRD groups excluded from the catalog
    pub ignored_groups: HashSet<String>,
    /// Resource names emitted ahead of the computed CRD names
    pub default_order: Vec<String>,
    pub ordering: OrderingOptions,
    /// Add catalogued kinds that nothing owns, at rank 0
    pub include_unowned_kinds: bool,
}

impl From<&Config> for RestoreOrderOptions {
    fn from(config: &Config) -> Self {
        Self {
            ignored_groups: config.ignored_groups.iter().cloned().collect(),
            default_order: config.default_order.clone(),
            ordering: OrderingOptions {
                deterministic_tie_break: config.deterministic_tie_break,
                direction: config.direction,
            },
            include_unowned_kinds: config.include_unowned_kinds,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreOrder {
    /// Ordered kinds, before projection
    pub kinds: Vec<String>,
    /// Default order followed by projected CRD names
    pub resources: Vec<String>,
    /// Resource types whose instances could not be listed
    pub failures: Vec<TypeFailure>,
}

/// Computes restore orders for one cluster
pub struct RestoreOrderService {
    source: Arc<dyn ClusterSource>,
    options: RestoreOrderOptions,
}

impl RestoreOrderService {
    pub fn new(source: Arc<dyn ClusterSource>, options: RestoreOrderOptions) -> Self {
        Self { source, options }
    }

    /// Compute the restore order
    ///
    /// Fails when the CRD list cannot be retrieved, when any CRD is malformed,
    /// or when `cancel` fires. Per-type listing failures are reported in
    /// [`RestoreOrder::failures`] instead.
    pub async fn compute(&self, cancel: CancellationToken) -> OrderResult<RestoreOrder> {
        if cancel.is_cancelled() {
            return Err(OrderError::Cancelled);
        }

        let crds = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OrderError::Cancelled),
            crds = self.source.list_crds() => crds.map_err(OrderError::CrdList)?,
        };

        let catalog = CrdCatalog::build(&crds, &self.options.ignored_groups)?;
        let identities = catalog.identities().cloned().collect();

        let enumeration =
            enumerate_instances(Arc::clone(&self.source), identities, cancel.clone()).await?;

        let mut ownership = OwnershipMap::build(&enumeration.instances, catalog.known_groups());
        if self.options.include_unowned_kinds {
            for kind in catalog.kinds() {
                ownership.insert_root(kind);
            }
        }

        let kinds = order_kinds(&ownership, self.options.ordering);
        let resources = project(
            &kinds,
            catalog.kind_to_crd_name(),
            &self.options.default_order,
        );

        tracing::info!(
            kinds = kinds.len(),
            resources = resources.len(),
            failures = enumeration.failures.len(),
            direction = %self.options.ordering.direction,
            "computed restore order"
        );

        Ok(RestoreOrder {
            kinds,
            resources,
            failures: enumeration.failures,
        })
    }
}
