//! Core graph data structure.
//!
//! `FamilyGraph` stores every person in a petgraph arena and keeps dense,
//! handle-indexed arrays for the relations queries need in O(1): father,
//! mother, children, spouses and the membership mask. It is built once by
//! [`GraphBuilder`](crate::GraphBuilder) and never mutated afterwards, so
//! any number of readers can share it.

use crate::edge::{Edge, EdgeKind, GraphEdge};
use crate::search_index::SearchIndex;
use lineage_core::{LineageConfig, Person};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense handle of a person inside the graph.
pub type PersonIdx = NodeIndex;

/// The immutable family graph.
#[derive(Debug)]
pub struct FamilyGraph {
    /// Person arena plus resolved relation edges.
    pub(crate) graph: DiGraph<Person, Edge>,

    /// Maps person ids to handles.
    pub(crate) id_index: HashMap<String, PersonIdx>,

    // Per-handle relation arrays, all `node_count()` long.
    pub(crate) father: Vec<Option<PersonIdx>>,
    pub(crate) mother: Vec<Option<PersonIdx>>,
    pub(crate) children: Vec<Vec<PersonIdx>>,
    pub(crate) spouses: Vec<Vec<PersonIdx>>,
    pub(crate) members: Vec<bool>,

    /// Members in person insertion order.
    pub(crate) member_order: Vec<PersonIdx>,

    /// Number of union rows accepted by the builder.
    pub(crate) union_count: usize,

    /// Normalized names for search.
    pub(crate) search_index: SearchIndex,

    pub(crate) config: LineageConfig,
}

/// A person together with their resolved immediate family.
#[derive(Debug, Clone, Serialize)]
pub struct PersonView<'g> {
    pub person: &'g Person,
    pub father: Option<&'g Person>,
    pub mother: Option<&'g Person>,
    pub spouses: Vec<&'g Person>,
    pub children: Vec<&'g Person>,
}

/// Graph statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub persons: usize,
    pub members: usize,
    pub unions: usize,
    pub parent_links: usize,
}

impl FamilyGraph {
    /// The configuration this graph was built with.
    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    // === handles

    /// Gets the handle for a person id.
    pub fn index_of(&self, id: &str) -> Option<PersonIdx> {
        self.id_index.get(id).copied()
    }

    /// Gets a person by handle.
    pub fn get(&self, idx: PersonIdx) -> Option<&Person> {
        self.graph.node_weight(idx)
    }

    fn ids<'a>(&'a self, handles: &'a [PersonIdx]) -> impl Iterator<Item = &'a str> + 'a {
        handles.iter().map(move |&h| self.graph[h].id.as_str())
    }

    fn persons<'a>(&'a self, handles: &'a [PersonIdx]) -> impl Iterator<Item = &'a Person> + 'a {
        handles.iter().map(move |&h| &self.graph[h])
    }

    pub(crate) fn father_idx(&self, idx: PersonIdx) -> Option<PersonIdx> {
        self.father.get(idx.index()).copied().flatten()
    }

    pub(crate) fn mother_idx(&self, idx: PersonIdx) -> Option<PersonIdx> {
        self.mother.get(idx.index()).copied().flatten()
    }

    pub(crate) fn is_member_idx(&self, idx: PersonIdx) -> bool {
        self.members.get(idx.index()).copied().unwrap_or(false)
    }

    /// Father if he is a member, else mother if she is, else nothing.
    pub(crate) fn member_parent_idx(&self, idx: PersonIdx) -> Option<PersonIdx> {
        if let Some(f) = self.father_idx(idx) {
            if self.is_member_idx(f) {
                return Some(f);
            }
        }
        self.mother_idx(idx).filter(|&m| self.is_member_idx(m))
    }

    fn non_member_parent_idx(&self, idx: PersonIdx) -> Option<PersonIdx> {
        if let Some(f) = self.father_idx(idx) {
            if !self.is_member_idx(f) {
                return Some(f);
            }
        }
        self.mother_idx(idx).filter(|&m| !self.is_member_idx(m))
    }

    pub(crate) fn spouse_handles(&self, idx: PersonIdx) -> &[PersonIdx] {
        self.spouses.get(idx.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn child_handles(&self, idx: PersonIdx) -> &[PersonIdx] {
        self.children.get(idx.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    // === keys

    /// Person ids in insertion order.
    pub fn persons_keys(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|p| p.id.as_str())
    }

    /// Member ids in insertion order. This is the node set the layout draws.
    pub fn members_keys(&self) -> impl Iterator<Item = &str> {
        self.ids(&self.member_order)
    }

    // === object getters

    /// Gets a person by id.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.get(self.index_of(id)?)
    }

    /// Gets a person by id only if they are a member.
    pub fn member(&self, id: &str) -> Option<&Person> {
        let idx = self.index_of(id)?;
        if self.is_member_idx(idx) {
            self.get(idx)
        } else {
            None
        }
    }

    /// Builds the read-only family view of a person.
    pub fn view(&self, id: &str) -> Option<PersonView<'_>> {
        let idx = self.index_of(id)?;
        Some(PersonView {
            person: &self.graph[idx],
            father: self.father_idx(idx).map(|h| &self.graph[h]),
            mother: self.mother_idx(idx).map(|h| &self.graph[h]),
            spouses: self.persons(self.spouse_handles(idx)).collect(),
            children: self.persons(self.child_handles(idx)).collect(),
        })
    }

    // === relationship resolvers (objects)

    /// Gets the father of a person.
    pub fn father_of(&self, id: &str) -> Option<&Person> {
        self.get(self.father_idx(self.index_of(id)?)?)
    }

    /// Gets the mother of a person.
    pub fn mother_of(&self, id: &str) -> Option<&Person> {
        self.get(self.mother_idx(self.index_of(id)?)?)
    }

    /// Father then mother, whichever are known.
    pub fn parents_of(&self, id: &str) -> Vec<&Person> {
        self.father_of(id).into_iter().chain(self.mother_of(id)).collect()
    }

    /// Gets every partner of a person, in union order.
    pub fn spouses_of(&self, id: &str) -> Vec<&Person> {
        match self.index_of(id) {
            Some(idx) => self.persons(self.spouse_handles(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Gets the children of a person across all their unions.
    pub fn children_of(&self, id: &str) -> Vec<&Person> {
        match self.index_of(id) {
            Some(idx) => self.persons(self.child_handles(idx)).collect(),
            None => Vec::new(),
        }
    }

    // === relationship resolvers (ids)

    /// Father id of a person.
    pub fn father_id_of(&self, id: &str) -> Option<&str> {
        self.father_of(id).map(|p| p.id.as_str())
    }

    /// Mother id of a person.
    pub fn mother_id_of(&self, id: &str) -> Option<&str> {
        self.mother_of(id).map(|p| p.id.as_str())
    }

    /// Father id then mother id, whichever are known.
    pub fn parents_id_of(&self, id: &str) -> Vec<&str> {
        self.father_id_of(id)
            .into_iter()
            .chain(self.mother_id_of(id))
            .collect()
    }

    /// Partner ids of a person.
    pub fn spouses_id_of(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(idx) => self.ids(self.spouse_handles(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Child ids of a person.
    pub fn children_id_of(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(idx) => self.ids(self.child_handles(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// The parent the bloodline continues through.
    pub fn member_parent_id_of(&self, id: &str) -> Option<&str> {
        let idx = self.member_parent_idx(self.index_of(id)?)?;
        Some(self.graph[idx].id.as_str())
    }

    /// The parent who married into the bloodline, if any.
    pub fn non_member_parent_id_of(&self, id: &str) -> Option<&str> {
        let idx = self.non_member_parent_idx(self.index_of(id)?)?;
        Some(self.graph[idx].id.as_str())
    }

    /// Partner ids that belong to the bloodline.
    pub fn member_spouses_id_of(&self, id: &str) -> Vec<&str> {
        self.filtered_spouses(id, true)
    }

    /// Partner ids that married in.
    pub fn non_member_spouses_id_of(&self, id: &str) -> Vec<&str> {
        self.filtered_spouses(id, false)
    }

    fn filtered_spouses(&self, id: &str, members: bool) -> Vec<&str> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.spouse_handles(idx)
            .iter()
            .filter(|&&s| self.is_member_idx(s) == members)
            .map(|&s| self.graph[s].id.as_str())
            .collect()
    }

    // === flags

    /// Checks if a person id is in the graph.
    pub fn has(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Checks if a person belongs to the bloodline.
    pub fn is_member(&self, id: &str) -> bool {
        self.index_of(id).is_some_and(|idx| self.is_member_idx(idx))
    }

    /// Checks if a person has a known father.
    pub fn has_father(&self, id: &str) -> bool {
        self.father_of(id).is_some()
    }

    /// Checks if a person has a known mother.
    pub fn has_mother(&self, id: &str) -> bool {
        self.mother_of(id).is_some()
    }

    /// Checks if a person has at least one known parent.
    pub fn has_parents(&self, id: &str) -> bool {
        self.has_father(id) || self.has_mother(id)
    }

    /// Checks if a person descends from a member.
    pub fn has_member_parent(&self, id: &str) -> bool {
        self.member_parent_id_of(id).is_some()
    }

    /// Checks if a person has any partner.
    pub fn has_spouses(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|idx| !self.spouse_handles(idx).is_empty())
    }

    /// Checks if a person has any child.
    pub fn has_children(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|idx| !self.child_handles(idx).is_empty())
    }

    /// True if the two ids are recorded partners in some union.
    pub fn are_spouses(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.spouse_handles(ia).contains(&ib),
            _ => false,
        }
    }

    // === export

    /// Parent→child edges whose parent is a member, father before mother.
    pub fn lineage_edges(&self) -> Vec<GraphEdge> {
        let mut out = Vec::new();
        for idx in self.graph.node_indices() {
            let child = self.graph[idx].id.as_str();
            let parents = [
                (self.father_idx(idx), EdgeKind::Father),
                (self.mother_idx(idx), EdgeKind::Mother),
            ];
            for (parent, kind) in parents {
                if let Some(p) = parent.filter(|&p| self.is_member_idx(p)) {
                    out.push(GraphEdge::parent_child(&self.graph[p].id, child, kind));
                }
            }
        }
        out
    }

    /// Returns the number of persons.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of resolved relation edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all persons.
    pub fn nodes(&self) -> impl Iterator<Item = &Person> {
        self.graph.node_weights()
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            persons: self.node_count(),
            members: self.member_order.len(),
            unions: self.union_count,
            parent_links: self
                .graph
                .edge_weights()
                .filter(|e| e.kind.is_parent())
                .count(),
        }
    }
}
