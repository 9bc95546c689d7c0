//! crd-order library
//!
//! Discovers the CustomResourceDefinitions of a cluster, learns which custom
//! resource kinds own which from live `ownerReferences`, and turns that into a
//! restore order for backup tooling. It can be used both as a binary and as
//! a library for testing.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod kube;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use catalog::CrdCatalog;
pub use error::{ListError, OrderError, OrderResult};
pub use graph::{Direction, OrderingOptions, OwnershipMap, order_kinds, project};
pub use models::{Instance, OwnerRef, ResourceIdentity};
pub use services::{RestoreOrder, RestoreOrderOptions, RestoreOrderService};
