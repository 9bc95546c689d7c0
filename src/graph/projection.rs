//! Projection of ordered kinds onto restore resource names

use std::collections::HashMap;

/// Map ordered kinds to CRD names and prepend the default order
///
/// Kinds without a CRD name are dropped; the relative order of the rest is
/// kept. The default order is emitted verbatim ahead of the projected names.
pub fn project(
    ordered_kinds: &[String],
    kind_to_crd_name: &HashMap<String, String>,
    default_order: &[String],
) -> Vec<String> {
    let mut resources = Vec::with_capacity(default_order.len() + ordered_kinds.len());
    resources.extend(default_order.iter().cloned());

    for kind in ordered_kinds {
        match kind_to_crd_name.get(kind) {
            Some(name) => resources.push(name.clone()),
            None => tracing::debug!(kind = %kind, "no CRD name for kind, dropping"),
        }
    }

    resources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names() -> HashMap<String, String> {
        [
            ("IAMRole", "iamroles.eks.example.com"),
            ("Nodegroup", "nodegroups.eks.example.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_prefix_then_projected() {
        let result = project(
            &strings(&["IAMRole", "Nodegroup"]),
            &names(),
            &strings(&["namespaces", "persistentvolumes"]),
        );
        assert_eq!(
            result,
            strings(&[
                "namespaces",
                "persistentvolumes",
                "iamroles.eks.example.com",
                "nodegroups.eks.example.com",
            ])
        );
    }

    #[test]
    fn test_unknown_kinds_dropped_in_order() {
        let result = project(
            &strings(&["Nodegroup", "Gateway", "IAMRole"]),
            &names(),
            &[],
        );
        assert_eq!(
            result,
            strings(&["nodegroups.eks.example.com", "iamroles.eks.example.com"])
        );
    }

    #[test]
    fn test_nothing_ordered_yields_default_order() {
        let defaults = strings(&["namespaces", "secrets"]);
        assert_eq!(project(&[], &names(), &defaults), defaults);
    }
}
