//! CRD discovery
//!
//! Turns the raw list of CustomResourceDefinition objects into a catalog of
//! resource identities.

mod crd_catalog;
pub mod resolver;

pub use crd_catalog::CrdCatalog;
pub use resolver::{CRD_KIND, resolve_crd, resolve_document};
