//! Edge types for the family graph.
//!
//! Only resolved relations become edges: a parent points at each child it
//! was attributed, and each complete union contributes one spouse edge.

use serde::{Deserialize, Serialize};

/// The type of relationship an edge records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Source is the resolved father of target.
    Father,

    /// Source is the resolved mother of target.
    Mother,

    /// Source and target are partners in a union. Stored once per union,
    /// read in both directions.
    Spouse,
}

impl EdgeKind {
    /// True for the two parent→child kinds.
    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Father | Self::Mother)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Spouse => "spouse",
        };
        write!(f, "{}", s)
    }
}

/// An edge in the family graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// The kind of relationship.
    pub kind: EdgeKind,

    /// Union row this edge was derived from, if any.
    pub union_id: Option<String>,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            union_id: None,
        }
    }

    /// Creates an edge that remembers its union.
    pub fn from_union(kind: EdgeKind, union_id: impl Into<String>) -> Self {
        Self {
            kind,
            union_id: Some(union_id.into()),
        }
    }
}

/// A parent→child edge handed to the layout collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `"<parent>-<child>"`.
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn parent_child(parent: &str, child: &str, kind: EdgeKind) -> Self {
        Self {
            id: format!("{}-{}", parent, child),
            source: parent.to_string(),
            target: child.to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_child_edge_id() {
        let e = GraphEdge::parent_child("p1", "c1", EdgeKind::Father);
        assert_eq!(e.id, "p1-c1");
        assert_eq!(e.source, "p1");
        assert_eq!(e.target, "c1");
    }

    #[test]
    fn test_kind_display_and_serde() {
        assert_eq!(EdgeKind::Mother.to_string(), "mother");
        assert_eq!(
            serde_json::to_string(&EdgeKind::Spouse).unwrap(),
            "\"spouse\""
        );
        assert!(EdgeKind::Father.is_parent());
        assert!(!EdgeKind::Spouse.is_parent());
    }
}
