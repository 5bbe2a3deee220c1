//! Graph builder for constructing the family graph from raw rows.
//!
//! The builder takes person, union and filiation rows and resolves them
//! into the graph's relation arrays.

use crate::edge::{Edge, EdgeKind};
use crate::graph::{FamilyGraph, PersonIdx};
use crate::membership::classify_members;
use crate::search_index::SearchIndex;
use lineage_core::{
    FiliationRow, LineageConfig, ParentConflict, Person, PersonRow, Sex, Snapshot, UnionRow,
};
use petgraph::graph::DiGraph;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Builds a FamilyGraph from rows.
///
/// The builder handles the two-pass process:
/// 1. Add all persons to the arena
/// 2. Resolve unions and filiations into spouse, child and parent links
///
/// Rows that point at unknown ids, or have no id at all, are dropped with a
/// debug log. Nothing here fails.
pub struct GraphBuilder {
    config: LineageConfig,
    graph: DiGraph<Person, Edge>,
    id_index: HashMap<String, PersonIdx>,
    /// Buffered until `build` so row order across collections doesn't matter.
    unions: Vec<UnionRow>,
    filiations: Vec<FiliationRow>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(LineageConfig::default())
    }
}

/// Resolved partners of one union.
#[derive(Debug, Clone, Copy)]
struct Partners {
    a: Option<PersonIdx>,
    b: Option<PersonIdx>,
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new(config: LineageConfig) -> Self {
        Self {
            config,
            graph: DiGraph::new(),
            id_index: HashMap::new(),
            unions: Vec::new(),
            filiations: Vec::new(),
        }
    }

    /// Adds person rows to the arena.
    ///
    /// A repeated id keeps its first row.
    pub fn add_persons(&mut self, rows: &[PersonRow]) -> &mut Self {
        let year = self.config.effective_year();
        for row in rows {
            let Some(id) = clean_id(row.id.as_deref()) else {
                debug!("Dropping person row without id");
                continue;
            };
            if self.id_index.contains_key(id) {
                debug!("Dropping duplicate person row {}", id);
                continue;
            }
            let idx = self.graph.add_node(Person::from_row(id, row, year));
            self.id_index.insert(id.to_string(), idx);
        }
        self
    }

    /// Queues union rows for resolution.
    pub fn add_unions(&mut self, rows: &[UnionRow]) -> &mut Self {
        self.unions.extend_from_slice(rows);
        self
    }

    /// Queues filiation rows for resolution.
    pub fn add_filiations(&mut self, rows: &[FiliationRow]) -> &mut Self {
        self.filiations.extend_from_slice(rows);
        self
    }

    /// Adds every collection of a snapshot.
    pub fn add_snapshot(&mut self, snapshot: &Snapshot) -> &mut Self {
        self.add_persons(&snapshot.persons)
            .add_unions(&snapshot.spouse_links)
            .add_filiations(&snapshot.child_links)
    }

    fn resolve(&self, id: Option<&str>, what: &str) -> Option<PersonIdx> {
        let id = clean_id(id)?;
        let idx = self.id_index.get(id).copied();
        if idx.is_none() {
            debug!("Dangling {} reference {}", what, id);
        }
        idx
    }

    /// Finishes building and returns the graph.
    pub fn build(self) -> FamilyGraph {
        let n = self.graph.node_count();
        let mut father: Vec<Option<PersonIdx>> = vec![None; n];
        let mut mother: Vec<Option<PersonIdx>> = vec![None; n];
        let mut children: Vec<Vec<PersonIdx>> = vec![Vec::new(); n];
        let mut spouses: Vec<Vec<PersonIdx>> = vec![Vec::new(); n];
        let mut spouse_edges = Vec::new();

        // Pass 1: unions -> partner lookup + spouse adjacency
        let mut partners_by_union: HashMap<&str, Partners> = HashMap::new();
        for row in &self.unions {
            let Some(union_id) = clean_id(row.id.as_deref()) else {
                debug!("Dropping union row without id");
                continue;
            };
            let partners = Partners {
                a: self.resolve(row.partner_a_id.as_deref(), "partner"),
                b: self.resolve(row.partner_b_id.as_deref(), "partner"),
            };
            if let (Some(a), Some(b)) = (partners.a, partners.b) {
                if a != b && !spouses[a.index()].contains(&b) {
                    spouses[a.index()].push(b);
                    spouses[b.index()].push(a);
                    spouse_edges.push((a, b, union_id.to_string()));
                }
            }
            partners_by_union.insert(union_id, partners);
        }

        // Pass 2: filiations -> children + inferred father/mother
        let mut dropped = 0usize;
        for row in &self.filiations {
            let Some(child) = self.resolve(row.child_id.as_deref(), "child") else {
                dropped += 1;
                continue;
            };
            let partners = clean_id(row.spouse_link_id.as_deref())
                .and_then(|id| partners_by_union.get(id).copied());
            let Some(partners) = partners else {
                debug!(
                    "Dropping filiation of {} with unknown union {:?}",
                    self.graph[child].id, row.spouse_link_id
                );
                dropped += 1;
                continue;
            };

            for parent in [partners.a, partners.b].into_iter().flatten() {
                if parent == child {
                    continue;
                }
                let list = &mut children[parent.index()];
                if !list.contains(&child) {
                    list.push(child);
                }
                let slot = match self.graph[parent].sex {
                    Sex::Male => &mut father[child.index()],
                    Sex::Female => &mut mother[child.index()],
                    Sex::Unknown => continue,
                };
                self.assign_parent(slot, parent, child);
            }
        }

        let members = classify_members(
            &self.graph,
            &father,
            &mother,
            &self.config.lastname_sentinel,
        );
        let member_order: Vec<PersonIdx> = self
            .graph
            .node_indices()
            .filter(|idx| members[idx.index()])
            .collect();

        let search_index = SearchIndex::build(&self.graph);

        let mut graph = self.graph;
        for (a, b, union_id) in spouse_edges {
            graph.add_edge(a, b, Edge::from_union(EdgeKind::Spouse, union_id));
        }
        for idx in graph.node_indices().collect::<Vec<_>>() {
            if let Some(f) = father[idx.index()] {
                graph.add_edge(f, idx, Edge::new(EdgeKind::Father));
            }
            if let Some(m) = mother[idx.index()] {
                graph.add_edge(m, idx, Edge::new(EdgeKind::Mother));
            }
        }

        info!(
            "Built family graph: {} persons, {} unions, {} filiations ({} dropped), {} members",
            graph.node_count(),
            partners_by_union.len(),
            self.filiations.len(),
            dropped,
            member_order.len()
        );

        FamilyGraph {
            union_count: partners_by_union.len(),
            graph,
            id_index: self.id_index,
            father,
            mother,
            children,
            spouses,
            members,
            member_order,
            search_index,
            config: self.config,
        }
    }

    fn assign_parent(&self, slot: &mut Option<PersonIdx>, parent: PersonIdx, child: PersonIdx) {
        match *slot {
            None => *slot = Some(parent),
            Some(existing) if existing == parent => {}
            Some(existing) => {
                let keep_first = self.config.parent_conflict == ParentConflict::FirstWins;
                warn!(
                    "Conflicting {} parents for {}: {} vs {}, keeping {}",
                    self.graph[parent].sex,
                    self.graph[child].id,
                    self.graph[existing].id,
                    self.graph[parent].id,
                    if keep_first { "first" } else { "last" }
                );
                if !keep_first {
                    *slot = Some(parent);
                }
            }
        }
    }
}

impl FamilyGraph {
    /// Builds a graph from the three row collections.
    pub fn from_rows(
        persons: &[PersonRow],
        unions: &[UnionRow],
        filiations: &[FiliationRow],
        config: LineageConfig,
    ) -> Self {
        let mut builder = GraphBuilder::new(config);
        builder
            .add_persons(persons)
            .add_unions(unions)
            .add_filiations(filiations);
        builder.build()
    }

    /// Builds a graph from a decoded snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, config: LineageConfig) -> Self {
        let mut builder = GraphBuilder::new(config);
        builder.add_snapshot(snapshot);
        builder.build()
    }
}

fn clean_id(id: Option<&str>) -> Option<&str> {
    let id = id?.trim();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
