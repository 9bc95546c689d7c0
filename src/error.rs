//! Error types
//!
//! `OrderError` covers everything that aborts a run. `ListError` is the
//! outcome of a single list call against the cluster and is only fatal when
//! it happens while listing the CRDs themselves.

/// Failure of one list request against the cluster
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The resource type is not served, or has nothing to list
    #[error("resource {resource} not found")]
    NotFound { resource: String },

    /// Any other failure (RBAC, timeouts, server errors, decode errors)
    #[error("failed to list {resource}: {source}")]
    Failed {
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ListError {
    /// Build a `Failed` error from anything error-like
    pub fn failed(
        resource: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ListError::Failed {
            resource: resource.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ListError::NotFound { .. })
    }
}

/// Errors that abort the ordering computation
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// A CRD object is missing a field the resolver needs
    #[error("malformed CRD {name}: {reason}")]
    MalformedCrd { name: String, reason: String },

    /// The CRDs themselves could not be listed
    #[error("cannot list CustomResourceDefinitions: {0}")]
    CrdList(#[source] ListError),

    /// The cluster could not be reached or the client could not be configured
    #[error("cannot connect to cluster: {0}")]
    Connectivity(String),

    /// The run was cancelled before it could complete
    #[error("operation cancelled")]
    Cancelled,
}

impl OrderError {
    pub(crate) fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        OrderError::MalformedCrd {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for ordering operations
pub type OrderResult<T> = Result<T, OrderError>;
