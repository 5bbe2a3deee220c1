//! Lineage Graph - Family relationship management
//!
//! This crate turns person, union and filiation rows into an immutable
//! family graph. It resolves fathers and mothers from union partners,
//! decides who belongs to the bloodline, walks ancestor chains, names the
//! kinship between two people and searches persons by name and birth date.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Id-based lookups
//! - Per-person father, mother, spouse and child arrays
//! - The membership mask and member insertion order
//! - Normalized names for search
//!
//! # Example
//!
//! ```
//! use lineage_core::{FiliationRow, LineageConfig, PersonRow, UnionRow};
//! use lineage_graph::FamilyGraph;
//!
//! let person = |id: &str, is_male: bool| PersonRow {
//!     id: Some(id.into()),
//!     is_male: Some(is_male),
//!     firstname: Some(id.into()),
//!     lastname: Some("Zlitni".into()),
//!     ..Default::default()
//! };
//! let union = UnionRow {
//!     id: Some("u".into()),
//!     partner_a_id: Some("omar".into()),
//!     partner_b_id: None,
//! };
//! let filiation = FiliationRow {
//!     child_id: Some("sami".into()),
//!     spouse_link_id: Some("u".into()),
//! };
//!
//! let graph = FamilyGraph::from_rows(
//!     &[person("omar", true), person("sami", true)],
//!     &[union],
//!     &[filiation],
//!     LineageConfig::default().with_sentinel("Zlitni"),
//! );
//!
//! assert_eq!(graph.father_id_of("sami"), Some("omar"));
//! assert_eq!(graph.ancestors_of("sami"), vec!["sami", "omar"]);
//! ```

mod ancestry;
mod builder;
mod edge;
mod graph;
mod kinship;
mod labels;
mod membership;
mod search_index;

#[cfg(test)]
mod test_support;

pub use ancestry::DEFAULT_PATRILINE_LEN;
pub use builder::GraphBuilder;
pub use edge::{Edge, EdgeKind, GraphEdge};
pub use graph::{FamilyGraph, GraphStats, PersonIdx, PersonView};
pub use kinship::{Kinship, Relation};
pub use labels::SearchLabel;
pub use membership::classify_members;
pub use search_index::{normalize, parse_birth, SearchHit, SearchIndex, SearchQuery};
