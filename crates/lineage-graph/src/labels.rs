//! Search labels: one display entry per named person, with homonyms told
//! apart by their parents.

use crate::graph::FamilyGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const UNKNOWN_NAME: &str = "Unknown";

/// A search-box entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLabel {
    pub id: String,
    /// The person's fullname.
    pub label: String,
    /// Text unique among labels whenever the data allows it.
    pub search_by: String,
    /// Member node to focus: self for members, else the first member spouse.
    pub resolve_id: Option<String>,
}

impl FamilyGraph {
    /// Builds search labels in person insertion order.
    ///
    /// Persons without a fullname get no label.
    pub fn search_labels(&self) -> Vec<SearchLabel> {
        let mut used: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        for idx in self.graph.node_indices() {
            let person = &self.graph[idx];
            let Some(fullname) = person.fullname.as_deref() else {
                continue;
            };

            let search_by = if self.search_index.exact(fullname).len() > 1 {
                let first = person.firstname.as_deref().unwrap_or(UNKNOWN_NAME);
                let last = person.lastname.as_deref().unwrap_or(UNKNOWN_NAME);
                let father = self.father_idx(idx).and_then(|f| self.graph[f].fullname.as_deref());
                let mother = self.mother_idx(idx).and_then(|m| self.graph[m].fullname.as_deref());

                match (father, mother) {
                    (Some(f), mother) => {
                        let mut label = format!("{} ({})", first, f);
                        if used.contains(&label) {
                            if let Some(m) = mother {
                                label = format!("{} ({} - {})", first, f, m);
                            }
                            if used.contains(&label) {
                                label = format!("{} [{}]", label, person.id);
                            }
                        }
                        label
                    }
                    (None, Some(m)) => {
                        let label = format!("{} ({})", last, m);
                        if used.contains(&label) {
                            format!("{} [{}]", label, person.id)
                        } else {
                            label
                        }
                    }
                    (None, None) => format!("{} [{}]", fullname, person.id),
                }
            } else {
                fullname.to_string()
            };
            used.insert(search_by.clone());

            let resolve_id = if self.is_member_idx(idx) {
                Some(person.id.clone())
            } else {
                self.spouse_handles(idx)
                    .iter()
                    .find(|&&s| self.is_member_idx(s))
                    .map(|&s| self.graph[s].id.clone())
            };

            out.push(SearchLabel {
                id: person.id.clone(),
                label: fullname.to_string(),
                search_by,
                resolve_id,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use crate::FamilyGraph;
    use lineage_core::PersonRow;

    fn label_of<'a>(labels: &'a [crate::SearchLabel], id: &str) -> &'a str {
        labels
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.search_by.as_str())
            .unwrap()
    }

    #[test]
    fn test_unique_names_search_by_fullname() {
        let g = family();
        let labels = g.search_labels();
        assert_eq!(labels.len(), 6);
        assert_eq!(label_of(&labels, "me"), "Sami Zlitni");
        assert_eq!(labels[0].label, "Salem Zlitni");
    }

    #[test]
    fn test_homonyms_are_told_apart() {
        let g = FamilyGraph::from_rows(
            &[
                male("o1", "Omar", "Zlitni"),
                male("o2", "Salah", "Zlitni"),
                female("m1", "Fatma", "Ben Ali"),
                female("m2", "Aisha", "Gharbi"),
                male("a1", "Ahmed", "Zlitni"),
                male("a2", "Ahmed", "Zlitni"),
                male("a3", "ahmed", "zlitni"),
                male("a4", "Ahmed", "Zlitni"),
                male("a5", "Ahmed", "Zlitni"),
                male("a6", "Ahmed", "Zlitni"),
                male("a7", "Ahmed", "Zlitni"),
            ],
            &[
                union("u1", Some("o1"), Some("m1")),
                union("u2", Some("o1"), Some("m2")),
                union("u3", Some("o2"), None),
                union("u4", None, Some("m2")),
            ],
            &[
                filiation("a1", "u1"),
                filiation("a2", "u2"),
                filiation("a3", "u1"),
                filiation("a4", "u3"),
                filiation("a5", "u4"),
                filiation("a7", "u1"),
            ],
            config(),
        );
        let labels = g.search_labels();
        assert_eq!(label_of(&labels, "a1"), "Ahmed (Omar Zlitni)");
        assert_eq!(label_of(&labels, "a2"), "Ahmed (Omar Zlitni - Aisha Gharbi)");
        assert_eq!(label_of(&labels, "a3"), "Ahmed (Omar Zlitni - Fatma Ben Ali)");
        assert_eq!(
            label_of(&labels, "a7"),
            "Ahmed (Omar Zlitni - Fatma Ben Ali) [a7]"
        );
        assert_eq!(label_of(&labels, "a4"), "Ahmed (Salah Zlitni)");
        assert_eq!(label_of(&labels, "a5"), "Zlitni (Aisha Gharbi)");
        assert_eq!(label_of(&labels, "a6"), "Ahmed Zlitni [a6]");
        // names are capitalized on ingest, the label keeps the stored form
        assert_eq!(labels.iter().find(|l| l.id == "a3").unwrap().label, "Ahmed Zlitni");
    }

    #[test]
    fn test_resolve_id() {
        let g = family();
        let labels = g.search_labels();
        let resolve = |id: &str| {
            labels
                .iter()
                .find(|l| l.id == id)
                .and_then(|l| l.resolve_id.clone())
        };
        assert_eq!(resolve("me").as_deref(), Some("me"));
        // married in: focus the member husband
        assert_eq!(resolve("mom").as_deref(), Some("dad"));
    }

    #[test]
    fn test_unnamed_and_isolated_persons() {
        let nameless = PersonRow {
            id: Some("x".into()),
            ..Default::default()
        };
        let g = FamilyGraph::from_rows(
            &[nameless, female("w", "Ines", "Mabrouk")],
            &[],
            &[],
            config(),
        );
        let labels = g.search_labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].id, "w");
        assert!(labels[0].resolve_id.is_none());
    }
}
