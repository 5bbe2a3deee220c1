//! Upward traversals: the member-parent ancestor chain and the patriline.
//!
//! Both walks are single-direction and stop at the first repeated id as
//! well as at a length cap, so cyclic rows can neither hang them nor make
//! them repeat themselves.

use crate::graph::{FamilyGraph, PersonIdx};
use lineage_core::Person;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default length of the rendered patriline, self included.
pub const DEFAULT_PATRILINE_LEN: usize = 10;

/// Length limit of an upward walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkCap {
    /// A safety cap from the graph config. Reaching it hints at bad data.
    Configured(usize),
    /// A length the caller asked for.
    Requested(usize),
}

impl WalkCap {
    fn len(self) -> usize {
        match self {
            WalkCap::Configured(n) | WalkCap::Requested(n) => n,
        }
    }

    fn warns(self) -> bool {
        matches!(self, WalkCap::Configured(_))
    }
}

impl FamilyGraph {
    /// Walks `step` upward from `start`, self first.
    ///
    /// Stops when `step` returns nothing, an id repeats, or the cap is
    /// reached.
    pub(crate) fn walk_up<F>(&self, start: PersonIdx, cap: WalkCap, step: F) -> Vec<PersonIdx>
    where
        F: Fn(PersonIdx) -> Option<PersonIdx>,
    {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut cur = Some(start);

        while let Some(idx) = cur {
            if out.len() >= cap.len() {
                if cap.warns() {
                    warn!(
                        "Upward walk from {} stopped at cap {}",
                        self.graph[start].id,
                        cap.len()
                    );
                } else {
                    debug!(
                        "Upward walk from {} truncated to {}",
                        self.graph[start].id,
                        cap.len()
                    );
                }
                break;
            }
            if !seen.insert(idx) {
                debug!(
                    "Cycle through {} while walking up from {}",
                    self.graph[idx].id, self.graph[start].id
                );
                break;
            }
            out.push(idx);
            cur = step(idx);
        }
        out
    }

    /// Ancestor chain along member parents: `[id, parent, grandparent, ...]`.
    ///
    /// Each step prefers the father if he is a member, else the mother if she
    /// is. Empty if `id` is unknown.
    pub fn ancestors_of(&self, id: &str) -> Vec<&str> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };
        let cap = WalkCap::Configured(self.config.ancestor_depth_limit);
        self.walk_up(start, cap, |idx| self.member_parent_idx(idx))
        .into_iter()
        .map(|idx| self.graph[idx].id.as_str())
        .collect()
    }

    /// Strict father chain, no membership filter: `[id, father, grandfather, ...]`.
    ///
    /// At most `max_len` ids are returned.
    pub fn bloodline_of(&self, id: &str, max_len: usize) -> Vec<&str> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };
        self.walk_up(start, WalkCap::Requested(max_len), |idx| self.father_idx(idx))
            .into_iter()
            .map(|idx| self.graph[idx].id.as_str())
            .collect()
    }

    /// Renders the patriline as a name, e.g. `"Sami son of Omar son of Salem Zlitni"`.
    ///
    /// The connector follows each child's sex. The last name is appended
    /// once, taken from the deepest ancestor that has one.
    pub fn patriline_name(&self, id: &str, max_len: usize) -> Option<String> {
        let chain: Vec<_> = self
            .bloodline_of(id, max_len)
            .into_iter()
            .filter_map(|pid| self.person(pid))
            .collect();
        let (&first, rest) = chain.split_first()?;

        let mut name = given_name(first);
        let mut child = first;
        for &parent in rest {
            let connector = if child.is_female() { "daughter of" } else { "son of" };
            name.push_str(&format!(" {} {}", connector, given_name(parent)));
            child = parent;
        }

        if let Some(last) = chain.iter().rev().find_map(|p| p.lastname.as_deref()) {
            name.push(' ');
            name.push_str(last);
        }
        Some(name)
    }
}

fn given_name(p: &Person) -> String {
    p.firstname
        .clone()
        .unwrap_or_else(|| p.display_name().to_string())
}
