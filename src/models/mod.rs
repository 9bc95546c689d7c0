//! Model layer
//!
//! Types shared by every stage of the ordering pipeline.
//!
//! Structure:
//! - `identity.rs` - Resource identity derived from a CRD
//! - `instance.rs` - Live custom-resource instances and their owner references
//! - `crd_document.rs` - The subset of a CRD document the resolver reads

pub mod crd_document;
pub mod identity;
pub mod instance;

pub use crd_document::CrdDocument;
pub use identity::{CrdDefinition, ResourceIdentity};
pub use instance::{Instance, OwnerRef, owner_group};
