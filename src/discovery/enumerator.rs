//! Concurrent instance enumeration
//!
//! One tokio task per resource type. Each task owns its result buffer and
//! hands it back through its join handle; buffers are merged only after
//! every task has finished, so no collection is shared between tasks.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::{ListError, OrderError, OrderResult};
use crate::kube::ClusterSource;
use crate::models::{Instance, ResourceIdentity};

/// A resource type whose enumeration failed for a reason other than "not found"
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TypeFailure {
    /// Fully-qualified resource name (`plural.group`)
    pub resource: String,
    pub message: String,
}

/// Outcome of enumerating every resource type
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// All instances across all types, in no particular order
    pub instances: Vec<Instance>,
    /// Types that were not served or not found
    pub not_found: Vec<String>,
    /// Types whose list request failed
    pub failures: Vec<TypeFailure>,
    /// Number of types that were listed successfully
    pub listed: usize,
}

/// Outcome of a single per-type task
enum TypeOutcome {
    Listed(Vec<Instance>),
    NotFound,
    Failed(String),
    Cancelled,
}

/// Enumerate every instance of every given resource type concurrently
///
/// Per-type failures are logged and reported, never propagated. The function
/// returns only once every task has finished, or fails with
/// [`OrderError::Cancelled`] as soon as `cancel` fires.
pub async fn enumerate_instances(
    source: Arc<dyn ClusterSource>,
    identities: Vec<ResourceIdentity>,
    cancel: CancellationToken,
) -> OrderResult<Enumeration> {
    let mut pending = FuturesUnordered::new();

    for identity in identities {
        let source = Arc::clone(&source);
        let cancel = cancel.clone();
        let resource = identity.qualified_resource();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => TypeOutcome::Cancelled,
                result = source.list_instances(&identity) => match result {
                    Ok(instances) => TypeOutcome::Listed(instances),
                    Err(ListError::NotFound { .. }) => TypeOutcome::NotFound,
                    Err(e) => TypeOutcome::Failed(e.to_string()),
                },
            }
        });

        pending.push(async move { (resource, handle.await) });
    }

    let mut enumeration = Enumeration::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OrderError::Cancelled),
            next = pending.next() => next,
        };

        let Some((resource, joined)) = next else {
            break;
        };

        match joined {
            Ok(TypeOutcome::Listed(instances)) => {
                tracing::debug!(resource = %resource, count = instances.len(), "listed instances");
                enumeration.listed += 1;
                enumeration.instances.extend(instances);
            }
            Ok(TypeOutcome::NotFound) => {
                tracing::debug!(resource = %resource, "resource not found, skipping");
                enumeration.not_found.push(resource);
            }
            Ok(TypeOutcome::Failed(message)) => {
                tracing::warn!(resource = %resource, error = %message, "cannot list resources");
                enumeration.failures.push(TypeFailure { resource, message });
            }
            Ok(TypeOutcome::Cancelled) => return Err(OrderError::Cancelled),
            Err(join_error) => {
                tracing::warn!(resource = %resource, error = %join_error, "list task did not complete");
                enumeration.failures.push(TypeFailure {
                    resource,
                    message: join_error.to_string(),
                });
            }
        }
    }

    tracing::info!(
        instances = enumeration.instances.len(),
        listed = enumeration.listed,
        not_found = enumeration.not_found.len(),
        failed = enumeration.failures.len(),
        "enumeration complete"
    );

    Ok(enumeration)
}
