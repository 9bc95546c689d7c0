//! Resource identity resolution
//!
//! Derives the canonical group/version/resource identity of a CRD. Any missing
//! field is a hard error: a defaulted group or version would silently list the
//! wrong thing (or nothing) further down the pipeline.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{OrderError, OrderResult};
use crate::models::crd_document::{CrdDocument, CrdSpec};
use crate::models::{CrdDefinition, ResourceIdentity};

/// `kind` of a CustomResourceDefinition object
pub const CRD_KIND: &str = "CustomResourceDefinition";

const SCOPE_NAMESPACED: &str = "Namespaced";
const SCOPE_CLUSTER: &str = "Cluster";

/// Resolve an untyped CRD object into its definition name and identity
///
/// A `null` value is treated as an absent object.
pub fn resolve_crd(object: &Value) -> OrderResult<CrdDefinition> {
    let hint = object
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();

    if object.is_null() {
        return Err(OrderError::malformed(hint, "object is absent"));
    }

    let doc = CrdDocument::deserialize(object)
        .map_err(|e| OrderError::malformed(&hint, format!("unexpected document shape: {}", e)))?;

    resolve_document(doc)
}

/// Resolve an already-decoded CRD document
pub fn resolve_document(doc: CrdDocument) -> OrderResult<CrdDefinition> {
    let display = doc.display_name().to_string();

    match doc.kind.as_deref() {
        Some(CRD_KIND) => {}
        Some(other) => {
            return Err(OrderError::malformed(
                display,
                format!("cannot get resource from non-CRD object {}", other),
            ));
        }
        None => return Err(OrderError::malformed(display, "missing kind")),
    }

    let name = doc
        .metadata
        .and_then(|m| m.name)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| OrderError::malformed(&display, "missing metadata.name"))?;

    let spec = doc
        .spec
        .ok_or_else(|| OrderError::malformed(&name, "missing spec"))?;

    let identity = identity_from_spec(&name, spec)?;
    Ok(CrdDefinition { name, identity })
}

fn identity_from_spec(name: &str, spec: CrdSpec) -> OrderResult<ResourceIdentity> {
    let group = required(name, "spec.group", spec.group)?;

    let names = spec
        .names
        .ok_or_else(|| OrderError::malformed(name, "missing spec.names"))?;
    let kind = required(name, "spec.names.kind", names.kind)?;
    let resource = required(name, "spec.names.plural", names.plural)?;

    let versions = spec
        .versions
        .ok_or_else(|| OrderError::malformed(name, "missing spec.versions"))?;
    // Declaration order runs oldest to newest; the last entry is the most recent
    let latest = versions
        .into_iter()
        .last()
        .ok_or_else(|| OrderError::malformed(name, "spec.versions is empty"))?;
    let version = required(name, "spec.versions[].name", latest.name)?;

    let namespaced = match spec.scope.as_deref() {
        Some(SCOPE_NAMESPACED) => true,
        Some(SCOPE_CLUSTER) => false,
        Some(other) => {
            return Err(OrderError::malformed(
                name,
                format!("unknown spec.scope {:?}", other),
            ));
        }
        None => return Err(OrderError::malformed(name, "missing spec.scope")),
    };

    Ok(ResourceIdentity {
        group,
        version,
        resource,
        kind,
        namespaced,
    })
}

fn required(name: &str, field: &str, value: Option<String>) -> OrderResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OrderError::malformed(name, format!("missing {}", field)))
}
