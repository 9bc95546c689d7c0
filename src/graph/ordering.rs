//! Rank-based ordering of owned kinds
//!
//! A kind's rank is the number of distinct kinds that can own it. Kinds are
//! grouped by rank and the groups emitted highest rank first by default, so
//! heavily-owned dependents are restored before the kinds that own them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::OwnershipMap;

/// Which end of the rank scale comes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Highest rank first
    #[default]
    DependentsFirst,
    /// Lowest rank first
    OwnersFirst,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::DependentsFirst => "dependentsFirst",
            Direction::OwnersFirst => "ownersFirst",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "dependentsfirst" => Ok(Direction::DependentsFirst),
            "ownersfirst" => Ok(Direction::OwnersFirst),
            _ => Err(format!(
                "unknown direction '{}' (expected dependentsFirst or ownersFirst)",
                s
            )),
        }
    }
}

/// Knobs for [`order_kinds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingOptions {
    /// Sort kinds lexically within a rank group
    pub deterministic_tie_break: bool,
    pub direction: Direction,
}

impl Default for OrderingOptions {
    fn default() -> Self {
        Self {
            deterministic_tie_break: true,
            direction: Direction::DependentsFirst,
        }
    }
}

/// Rank of every owned kind
pub fn rank_kinds(map: &OwnershipMap) -> HashMap<&str, usize> {
    map.iter().map(|(kind, owners)| (kind, owners.len())).collect()
}

/// Group kinds by rank, ascending
///
/// Within a group kinds keep map enumeration order unless
/// `deterministic_tie_break` is set, in which case they are sorted.
pub fn group_by_rank<'a>(
    ranks: &HashMap<&'a str, usize>,
    deterministic_tie_break: bool,
) -> BTreeMap<usize, Vec<&'a str>> {
    let mut groups: BTreeMap<usize, Vec<&'a str>> = BTreeMap::new();
    for (kind, rank) in ranks {
        groups.entry(*rank).or_default().push(*kind);
    }

    if deterministic_tie_break {
        for kinds in groups.values_mut() {
            kinds.sort_unstable();
        }
    }

    groups
}

/// Produce the restore order of every owned kind in `map`
///
/// The result contains each key of `map` exactly once and nothing else.
pub fn order_kinds(map: &OwnershipMap, options: OrderingOptions) -> Vec<String> {
    let ranks = rank_kinds(map);
    let groups = group_by_rank(&ranks, options.deterministic_tie_break);

    tracing::debug!(
        kinds = ranks.len(),
        rank_groups = groups.len(),
        direction = %options.direction,
        "ordering kinds"
    );

    let emit = |kinds: &Vec<&str>| kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>();
    match options.direction {
        Direction::DependentsFirst => groups.values().rev().flat_map(emit).collect(),
        Direction::OwnersFirst => groups.values().flat_map(emit).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> OwnershipMap {
        [
            ("IAMRole", vec!["Nodegroup"]),
            ("Nodegroup", vec!["NodegroupDeployment"]),
            ("NodegroupDeployment", vec![]),
        ]
        .into_iter()
        .collect()
    }

    fn fan() -> OwnershipMap {
        [
            ("Subnet", vec!["Network", "Cluster", "Gateway"]),
            ("Route", vec!["Network", "Gateway"]),
            ("Firewall", vec!["Network", "Cluster"]),
            ("Address", vec!["Network"]),
            ("Network", vec![]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_ranks_count_distinct_owners() {
        let map = fan();
        let ranks = rank_kinds(&map);
        assert_eq!(ranks["Subnet"], 3);
        assert_eq!(ranks["Route"], 2);
        assert_eq!(ranks["Address"], 1);
        assert_eq!(ranks["Network"], 0);
        assert!(!ranks.contains_key("Gateway"));
    }

    #[test]
    fn test_chain_dependents_first() {
        let order = order_kinds(&chain(), OrderingOptions::default());
        assert_eq!(order[2], "NodegroupDeployment");

        let mut head = order[..2].to_vec();
        head.sort();
        assert_eq!(head, vec!["IAMRole", "Nodegroup"]);
    }

    #[test]
    fn test_tie_break_sorts_within_group() {
        let order = order_kinds(&chain(), OrderingOptions::default());
        assert_eq!(order, vec!["IAMRole", "Nodegroup", "NodegroupDeployment"]);
    }

    #[test]
    fn test_descending_rank() {
        let order = order_kinds(&fan(), OrderingOptions::default());
        assert_eq!(
            order,
            vec!["Subnet", "Firewall", "Route", "Address", "Network"]
        );
    }

    #[test]
    fn test_owners_first_reverses_groups() {
        let options = OrderingOptions {
            direction: Direction::OwnersFirst,
            ..Default::default()
        };
        let order = order_kinds(&fan(), options);
        assert_eq!(
            order,
            vec!["Network", "Address", "Firewall", "Route", "Subnet"]
        );
    }

    #[test]
    fn test_without_tie_break_groups_still_ordered() {
        let options = OrderingOptions {
            deterministic_tie_break: false,
            ..Default::default()
        };
        let map = fan();
        let order = order_kinds(&map, options);
        let ranks = rank_kinds(&map);

        assert_eq!(order.len(), 5);
        for pair in order.windows(2) {
            assert!(ranks[pair[0].as_str()] >= ranks[pair[1].as_str()]);
        }
    }

    #[test]
    fn test_idempotent() {
        let map = fan();
        let first = order_kinds(&map, OrderingOptions::default());
        let second = order_kinds(&map, OrderingOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_map() {
        assert!(order_kinds(&OwnershipMap::new(), OrderingOptions::default()).is_empty());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(
            "dependentsFirst".parse::<Direction>().unwrap(),
            Direction::DependentsFirst
        );
        assert_eq!(
            "owners-first".parse::<Direction>().unwrap(),
            Direction::OwnersFirst
        );
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::OwnersFirst.to_string(), "ownersFirst");
    }
}
