//! Intermediate schema for CRD documents
//!
//! Only the fields the resolver consumes are modelled. Every field is optional
//! at this layer so that a missing field surfaces as a named `MalformedCrd`
//! error during validation instead of a generic decode failure.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdDocument {
    pub kind: Option<String>,
    pub metadata: Option<CrdMetadata>,
    pub spec: Option<CrdSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrdMetadata {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrdSpec {
    pub group: Option<String>,
    pub names: Option<CrdNames>,
    pub versions: Option<Vec<CrdVersion>>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrdNames {
    pub kind: Option<String>,
    pub plural: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrdVersion {
    pub name: Option<String>,
}

impl CrdDocument {
    /// Best-effort name for error messages, before validation
    pub fn display_name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or("<unnamed>")
    }
}
