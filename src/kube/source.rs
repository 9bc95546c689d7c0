//! Cluster access for the ordering pipeline
//!
//! [`ClusterSource`] is the only way the pipeline talks to a cluster: list the
//! CRDs, and list every instance of one resource type. [`KubeSource`] backs it
//! with a kube-rs client using untyped `DynamicObject` APIs.

use async_trait::async_trait;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams, TypeMeta};
use kube::Client;
use serde_json::Value;

use crate::catalog::CRD_KIND;
use crate::error::ListError;
use crate::models::{Instance, OwnerRef, ResourceIdentity};

/// Page size for list requests
const LIST_PAGE_SIZE: u32 = 500;

const CRD_GROUP: &str = "apiextensions.k8s.io";
const CRD_VERSION: &str = "v1";
const CRD_PLURAL: &str = "customresourcedefinitions";

/// Read access to CRDs and custom-resource instances
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// List every CustomResourceDefinition as an untyped document
    async fn list_crds(&self) -> Result<Vec<Value>, ListError>;

    /// List every live instance of one resource type, across all namespaces
    /// for namespaced types
    async fn list_instances(&self, identity: &ResourceIdentity)
    -> Result<Vec<Instance>, ListError>;
}

/// `ApiResource` for `apiextensions.k8s.io/v1` CustomResourceDefinitions
pub fn crd_api_resource() -> ApiResource {
    ApiResource::from_gvk_with_plural(
        &GroupVersionKind::gvk(CRD_GROUP, CRD_VERSION, CRD_KIND),
        CRD_PLURAL,
    )
}

fn api_resource_for(identity: &ResourceIdentity) -> ApiResource {
    ApiResource::from_gvk_with_plural(
        &GroupVersionKind::gvk(&identity.group, &identity.version, &identity.kind),
        &identity.resource,
    )
}

/// [`ClusterSource`] backed by a live cluster
#[derive(Clone)]
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List all objects of a resource type, following continue tokens
    async fn list_all(&self, ar: &ApiResource) -> Result<Vec<DynamicObject>, kube::Error> {
        // Api::all covers every namespace for namespaced types as well
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), ar);
        let mut items = Vec::new();
        let mut params = ListParams::default().limit(LIST_PAGE_SIZE);

        loop {
            let page = api.list(&params).await?;
            items.extend(page.items);
            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    params = params.continue_token(&token);
                }
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl ClusterSource for KubeSource {
    async fn list_crds(&self) -> Result<Vec<Value>, ListError> {
        let ar = crd_api_resource();
        let objects = self
            .list_all(&ar)
            .await
            .map_err(|e| list_error(CRD_PLURAL, e))?;

        tracing::debug!(count = objects.len(), "listed CRDs");

        objects
            .into_iter()
            .map(|obj| {
                serde_json::to_value(with_type_meta(obj, &ar))
                    .map_err(|e| ListError::failed(CRD_PLURAL, e))
            })
            .collect()
    }

    async fn list_instances(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Vec<Instance>, ListError> {
        let ar = api_resource_for(identity);
        let resource = identity.qualified_resource();

        tracing::debug!(
            resource = %resource,
            version = %identity.version,
            namespaced = identity.namespaced,
            "listing instances"
        );

        let objects = self
            .list_all(&ar)
            .await
            .map_err(|e| list_error(&resource, e))?;

        Ok(objects
            .into_iter()
            .map(|obj| instance_from(with_type_meta(obj, &ar)))
            .collect())
    }
}

/// Map a kube error to a list outcome, separating "not found" from failures
fn list_error(resource: &str, err: kube::Error) -> ListError {
    match err {
        kube::Error::Api(response) if response.code == 404 => ListError::NotFound {
            resource: resource.to_string(),
        },
        other => ListError::failed(resource, other),
    }
}

/// List items may omit `apiVersion`/`kind`; fill them from the listed type
fn with_type_meta(mut obj: DynamicObject, ar: &ApiResource) -> DynamicObject {
    if obj.types.as_ref().is_none_or(|t| t.kind.is_empty()) {
        obj.types = Some(TypeMeta {
            api_version: ar.api_version.clone(),
            kind: ar.kind.clone(),
        });
    }
    obj
}

fn instance_from(obj: DynamicObject) -> Instance {
    let kind = obj.types.map(|t| t.kind).unwrap_or_default();
    let owner_references = obj
        .metadata
        .owner_references
        .unwrap_or_default()
        .into_iter()
        .map(|owner| OwnerRef {
            api_version: owner.api_version,
            kind: owner.kind,
            name: owner.name,
        })
        .collect();

    Instance {
        kind,
        name: obj.metadata.name.unwrap_or_default(),
        namespace: obj.metadata.namespace,
        owner_references,
    }
}
