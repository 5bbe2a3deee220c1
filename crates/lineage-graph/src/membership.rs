//! Membership classification.
//!
//! A person belongs to the tracked bloodline when they have a resolved
//! father or mother, or when they are a male carrying the root family name.
//! The second rule seeds the oldest generation, which has no recorded
//! parents. It is a name heuristic, so the sentinel comes from config.

use crate::edge::Edge;
use crate::graph::PersonIdx;
use lineage_core::{Person, Sex};
use petgraph::graph::DiGraph;

/// Computes the membership mask, indexed by person handle.
///
/// Must run after all father/mother assignments are final. It only reads
/// the resolved parent arrays, so a single pass is enough.
pub fn classify_members(
    persons: &DiGraph<Person, Edge>,
    father: &[Option<PersonIdx>],
    mother: &[Option<PersonIdx>],
    sentinel: &str,
) -> Vec<bool> {
    let sentinel = sentinel.trim();
    persons
        .node_indices()
        .map(|idx| {
            let has_parent = father.get(idx.index()).copied().flatten().is_some()
                || mother.get(idx.index()).copied().flatten().is_some();
            has_parent || is_root_male(&persons[idx], sentinel)
        })
        .collect()
}

fn is_root_male(person: &Person, sentinel: &str) -> bool {
    person.sex == Sex::Male && person.lastname.as_deref() == Some(sentinel)
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use crate::FamilyGraph;

    #[test]
    fn test_parentless_sentinel_male_is_member() {
        let g = FamilyGraph::from_rows(&[male("a", "Ali", "Zlitni")], &[], &[], config());
        assert!(g.is_member("a"));
    }

    #[test]
    fn test_parentless_other_name_is_not_member() {
        let g = FamilyGraph::from_rows(&[male("a", "Ali", "Trabelsi")], &[], &[], config());
        assert!(!g.is_member("a"));
    }

    #[test]
    fn test_sentinel_female_is_not_seeded() {
        let g = FamilyGraph::from_rows(&[female("a", "Aisha", "Zlitni")], &[], &[], config());
        assert!(!g.is_member("a"));
    }

    #[test]
    fn test_any_resolved_parent_makes_member() {
        // the mother is not a member herself, the child still is
        let g = FamilyGraph::from_rows(
            &[female("m", "Fatma", "Ben Ali"), female("c", "Mariem", "Ben Ali")],
            &[union("u", Some("m"), None)],
            &[filiation("c", "u")],
            config(),
        );
        assert!(!g.is_member("m"));
        assert!(g.is_member("c"));
    }

    #[test]
    fn test_members_keys_in_insertion_order() {
        let g = family();
        let keys: Vec<&str> = g.members_keys().collect();
        assert_eq!(keys, vec!["gf", "dad", "me", "sis"]);
    }

    #[test]
    fn test_sentinel_is_configurable() {
        let cfg = config().with_sentinel("Trabelsi");
        let g = FamilyGraph::from_rows(&[male("a", "Ali", "Trabelsi")], &[], &[], cfg);
        assert!(g.is_member("a"));
    }
}
