//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides the
//! [`ClusterSource`] capability the ordering pipeline consumes.
//!
//! Supports HTTP/HTTPS proxy configuration via standard environment variables
//! (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`), handled by kube-rs itself.

mod source;

pub use source::{ClusterSource, KubeSource, crd_api_resource};
#[cfg(test)]
pub use source::MockClusterSource;

use kube::config::{AuthInfo, KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::PathBuf;

use crate::error::{OrderError, OrderResult};

/// How to reach the cluster and who to act as
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// Explicit kubeconfig path; standard inference is used when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of `current-context`
    pub context: Option<String>,
    /// User to impersonate
    pub impersonate_user: Option<String>,
    /// Groups to impersonate
    pub impersonate_groups: Vec<String>,
}

impl ConnectionOptions {
    fn impersonates(&self) -> bool {
        self.impersonate_user.is_some() || !self.impersonate_groups.is_empty()
    }
}

/// Initialize and return a Kubernetes client
///
/// Uses the default loading strategy (in-cluster config, `KUBECONFIG`,
/// `~/.kube/config`) unless a kubeconfig path or a context is given.
/// Impersonation is applied to the resulting config, so it also works
/// in-cluster without a kubeconfig file.
pub async fn create_client(options: &ConnectionOptions) -> OrderResult<Client> {
    let mut config = if options.kubeconfig.is_none() && options.context.is_none() {
        Config::infer()
            .await
            .map_err(|e| OrderError::Connectivity(format!("cannot infer kube config: {}", e)))?
    } else {
        let kubeconfig = match &options.kubeconfig {
            Some(path) => Kubeconfig::read_from(path).map_err(|e| {
                OrderError::Connectivity(format!(
                    "cannot read kubeconfig {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => Kubeconfig::read()
                .map_err(|e| OrderError::Connectivity(format!("cannot read kubeconfig: {}", e)))?,
        };

        let kube_options = KubeConfigOptions {
            context: options.context.clone(),
            ..Default::default()
        };
        Config::from_custom_kubeconfig(kubeconfig, &kube_options)
            .await
            .map_err(|e| OrderError::Connectivity(format!("cannot build kube config: {}", e)))?
    };

    apply_impersonation(&mut config.auth_info, options);

    tracing::debug!(cluster = %config.cluster_url, "connecting to cluster");

    Client::try_from(config)
        .map_err(|e| OrderError::Connectivity(format!("cannot create client: {}", e)))
}

/// Set the `Impersonate-User` / `Impersonate-Group` identity on the
/// resolved user
fn apply_impersonation(auth_info: &mut AuthInfo, options: &ConnectionOptions) {
    if !options.impersonates() {
        return;
    }

    if let Some(user) = &options.impersonate_user {
        auth_info.impersonate = Some(user.clone());
    }
    if !options.impersonate_groups.is_empty() {
        auth_info.impersonate_groups = Some(options.impersonate_groups.clone());
    }

    tracing::debug!(
        user = ?options.impersonate_user,
        groups = ?options.impersonate_groups,
        "impersonation configured"
    );
}

/// Name of the context a run will use, for context-specific configuration
///
/// Returns `None` when no kubeconfig can be read (e.g. in-cluster).
pub fn resolve_context_name(options: &ConnectionOptions) -> Option<String> {
    if let Some(context) = &options.context {
        return Some(context.clone());
    }
    let kubeconfig = match &options.kubeconfig {
        Some(path) => Kubeconfig::read_from(path).ok()?,
        None => Kubeconfig::read().ok()?,
    };
    kubeconfig.current_context
}
