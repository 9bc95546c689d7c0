//! End-to-end pipeline tests
//!
//! Drive `RestoreOrderService` against an in-memory cluster that serves CRD
//! documents and instances, including unserved and failing resource types.

use async_trait::async_trait;
use crd_order::error::ListError;
use crd_order::kube::ClusterSource;
use crd_order::models::{Instance, ResourceIdentity};
use crd_order::{
    Direction, OrderError, OrderingOptions, RestoreOrderOptions, RestoreOrderService,
};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// In-memory cluster keyed by kind
#[derive(Default)]
struct FakeCluster {
    crds: Vec<Value>,
    instances: HashMap<String, Vec<Instance>>,
    not_found: HashSet<String>,
    failing: HashSet<String>,
    hang: bool,
    listed: Mutex<Vec<String>>,
}

impl FakeCluster {
    fn with_crd(mut self, group: &str, kind: &str, plural: &str) -> Self {
        self.crds.push(json!({
            "apiVersion": "apiextensions.k8s.io/v1",
            "kind": "CustomResourceDefinition",
            "metadata": { "name": format!("{}.{}", plural, group) },
            "spec": {
                "group": group,
                "names": { "kind": kind, "plural": plural },
                "scope": "Namespaced",
                "versions": [{ "name": "v1beta1" }, { "name": "v1" }]
            }
        }));
        self
    }

    fn with_instance(mut self, instance: Instance) -> Self {
        self.instances
            .entry(instance.kind.clone())
            .or_default()
            .push(instance);
        self
    }

    fn listed(&self) -> Vec<String> {
        let mut listed = self.listed.lock().unwrap().clone();
        listed.sort();
        listed
    }
}

#[async_trait]
impl ClusterSource for FakeCluster {
    async fn list_crds(&self) -> Result<Vec<Value>, ListError> {
        Ok(self.crds.clone())
    }

    async fn list_instances(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Vec<Instance>, ListError> {
        if self.hang {
            futures::future::pending::<()>().await;
        }

        self.listed.lock().unwrap().push(identity.kind.clone());
        // Yield so the per-type tasks interleave
        tokio::time::sleep(Duration::from_millis(1)).await;

        if self.not_found.contains(&identity.kind) {
            return Err(ListError::NotFound {
                resource: identity.qualified_resource(),
            });
        }
        if self.failing.contains(&identity.kind) {
            return Err(ListError::failed(
                identity.qualified_resource(),
                "forbidden: cannot list resource",
            ));
        }
        Ok(self
            .instances
            .get(&identity.kind)
            .cloned()
            .unwrap_or_default())
    }
}

const EKS: &str = "eks.example.com";
const EKS_V1: &str = "eks.example.com/v1";

fn eks_cluster() -> FakeCluster {
    FakeCluster::default()
        .with_crd(EKS, "IAMRole", "iamroles")
        .with_crd(EKS, "Nodegroup", "nodegroups")
        .with_crd(EKS, "NodegroupDeployment", "nodegroupdeployments")
        .with_instance(Instance::new("IAMRole", "role-1").owned_by(EKS_V1, "Nodegroup"))
        .with_instance(Instance::new("IAMRole", "role-2").owned_by(EKS_V1, "Nodegroup"))
        .with_instance(Instance::new("Nodegroup", "ng-1").owned_by(EKS_V1, "NodegroupDeployment"))
        .with_instance(Instance::new("NodegroupDeployment", "deploy"))
}

fn options(default_order: &[&str]) -> RestoreOrderOptions {
    RestoreOrderOptions {
        default_order: default_order.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_owner_chain_end_to_end() {
    let service = RestoreOrderService::new(
        Arc::new(eks_cluster()),
        options(&["namespaces", "persistentvolumes"]),
    );

    let order = service.compute(CancellationToken::new()).await.unwrap();

    assert_eq!(order.kinds, vec!["IAMRole", "Nodegroup"]);
    assert_eq!(
        order.resources,
        vec![
            "namespaces",
            "persistentvolumes",
            "iamroles.eks.example.com",
            "nodegroups.eks.example.com",
        ]
    );
    assert!(order.failures.is_empty());
}

#[tokio::test]
async fn test_cluster_without_instances() {
    let cluster = FakeCluster::default()
        .with_crd(EKS, "IAMRole", "iamroles")
        .with_crd(EKS, "Nodegroup", "nodegroups");
    let service = RestoreOrderService::new(Arc::new(cluster), options(&["namespaces"]));

    let order = service.compute(CancellationToken::new()).await.unwrap();

    assert!(order.kinds.is_empty());
    assert_eq!(order.resources, vec!["namespaces"]);
}

#[tokio::test]
async fn test_ignored_group_is_not_listed_and_never_owns() {
    let cluster = Arc::new(
        eks_cluster()
            .with_crd("kafka.strimzi.io", "KafkaTopic", "kafkatopics")
            .with_instance(
                Instance::new("NodegroupDeployment", "owned")
                    .owned_by("kafka.strimzi.io/v1beta2", "KafkaTopic"),
            ),
    );

    let service = RestoreOrderService::new(
        Arc::clone(&cluster) as Arc<dyn ClusterSource>,
        RestoreOrderOptions {
            ignored_groups: HashSet::from(["kafka.strimzi.io".to_string()]),
            ..Default::default()
        },
    );

    let order = service.compute(CancellationToken::new()).await.unwrap();

    assert_eq!(order.kinds, vec!["IAMRole", "Nodegroup"]);
    assert!(!cluster.listed().contains(&"KafkaTopic".to_string()));
    assert_eq!(cluster.listed().len(), 3);
}

#[tokio::test]
async fn test_builtin_owners_are_ignored() {
    let cluster = FakeCluster::default()
        .with_crd(EKS, "IAMRole", "iamroles")
        .with_instance(
            Instance::new("IAMRole", "role-1")
                .owned_by("v1", "ConfigMap")
                .owned_by("apps/v1", "Deployment"),
        );
    let service = RestoreOrderService::new(Arc::new(cluster), RestoreOrderOptions::default());

    let order = service.compute(CancellationToken::new()).await.unwrap();
    assert!(order.kinds.is_empty());
    assert!(order.resources.is_empty());
}

#[tokio::test]
async fn test_failing_types_are_reported_not_fatal() {
    let mut cluster = eks_cluster().with_crd("s3.example.com", "Bucket", "buckets");
    cluster.failing.insert("Bucket".to_string());
    cluster.not_found.insert("NodegroupDeployment".to_string());

    let service = RestoreOrderService::new(Arc::new(cluster), RestoreOrderOptions::default());
    let order = service.compute(CancellationToken::new()).await.unwrap();

    assert_eq!(order.kinds, vec!["IAMRole", "Nodegroup"]);
    assert_eq!(order.failures.len(), 1);
    assert_eq!(order.failures[0].resource, "buckets.s3.example.com");
    assert!(order.failures[0].message.contains("forbidden"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fifty_types_all_collected() {
    let mut cluster = FakeCluster::default().with_crd("root.example.com", "Root", "roots");
    for i in 0..49 {
        let kind = format!("Leaf{}", i);
        cluster = cluster.with_crd("leaf.example.com", &kind, &format!("leaves{}", i));
        for n in 0..5 {
            cluster = cluster.with_instance(
                Instance::new(kind.clone(), format!("leaf-{}", n))
                    .owned_by("root.example.com/v1", "Root"),
            );
        }
    }
    let cluster = Arc::new(cluster);

    let service = RestoreOrderService::new(
        Arc::clone(&cluster) as Arc<dyn ClusterSource>,
        RestoreOrderOptions::default(),
    );
    let order = service.compute(CancellationToken::new()).await.unwrap();

    assert_eq!(cluster.listed().len(), 50);
    assert_eq!(order.kinds.len(), 49);
    assert_eq!(order.resources.len(), 49);
    let mut expected: Vec<String> = (0..49).map(|i| format!("Leaf{}", i)).collect();
    expected.sort();
    assert_eq!(order.kinds, expected);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let cluster: Arc<dyn ClusterSource> = Arc::new(eks_cluster());
    let service = RestoreOrderService::new(cluster, options(&["namespaces"]));

    let first = service.compute(CancellationToken::new()).await.unwrap();
    let second = service.compute(CancellationToken::new()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_owners_first_with_unowned_kinds() {
    let service = RestoreOrderService::new(
        Arc::new(eks_cluster()),
        RestoreOrderOptions {
            include_unowned_kinds: true,
            ordering: OrderingOptions {
                direction: Direction::OwnersFirst,
                ..Default::default()
            },
            ..Default::default()
        },
    );

    let order = service.compute(CancellationToken::new()).await.unwrap();
    assert_eq!(
        order.kinds,
        vec!["NodegroupDeployment", "IAMRole", "Nodegroup"]
    );
}

#[tokio::test]
async fn test_cancellation_aborts_without_result() {
    let cluster = FakeCluster {
        hang: true,
        ..eks_cluster()
    };
    let service = RestoreOrderService::new(Arc::new(cluster), RestoreOrderOptions::default());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), service.compute(cancel))
        .await
        .expect("cancellation should stop the run promptly");
    assert!(matches!(result, Err(OrderError::Cancelled)));
}
