//! Kinship resolution between two persons.
//!
//! Both persons walk up their member-parent chains; the first id on B's
//! chain that also sits on A's chain is the lowest common ancestor (LCA).
//! The generation distance of each side to the LCA, plus the sex of the
//! endpoints and of the first step up on each side, picks the relation name.
//!
//! Nothing is cached: each call is a pure computation over the frozen graph.

use crate::ancestry::WalkCap;
use crate::graph::{FamilyGraph, PersonIdx};
use lineage_core::{Person, Sex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structural result of a kinship query.
#[derive(Debug, Clone, Serialize)]
pub struct Kinship<'g> {
    pub person_a: &'g Person,
    pub person_b: &'g Person,
    /// Lowest common ancestor on the member-parent chains.
    pub common: &'g Person,
    /// Generations from A up to `common`.
    pub depth_a: usize,
    /// Generations from B up to `common`.
    pub depth_b: usize,
    /// A's member parent, if A is not the LCA.
    pub a_first_up: Option<&'g Person>,
    /// B's member parent, if B is not the LCA.
    pub b_first_up: Option<&'g Person>,
    /// Open path A→common→B, excluding A, B and the common ancestor.
    pub path: Vec<&'g Person>,
}

/// The name of A's relation to B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    #[serde(rename = "self")]
    Myself,
    Father,
    Mother,
    Son,
    Daughter,
    Grandfather,
    Grandmother,
    GreatGrandfather,
    GreatGrandmother,
    GreatGreatGrandfather,
    GreatGreatGrandmother,
    Grandson,
    Granddaughter,
    GreatGrandson,
    GreatGranddaughter,
    GreatGreatGrandson,
    GreatGreatGranddaughter,
    Brother,
    Sister,
    Husband,
    Wife,
    PaternalUncle,
    MaternalUncle,
    PaternalAunt,
    MaternalAunt,
    NephewThroughBrother,
    NieceThroughBrother,
    NephewThroughSister,
    NieceThroughSister,
    MaleCousinThroughPaternalUncle,
    MaleCousinThroughPaternalAunt,
    MaleCousinThroughMaternalUncle,
    MaleCousinThroughMaternalAunt,
    FemaleCousinThroughPaternalUncle,
    FemaleCousinThroughPaternalAunt,
    FemaleCousinThroughMaternalUncle,
    FemaleCousinThroughMaternalAunt,
    /// Common ancestor exists but is further than the configured depth.
    Distant,
    /// Common ancestor within depth, but the pattern or sex data is ambiguous.
    Unknown,
}

impl Relation {
    /// Stable kebab-case key, suitable as a translation key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Myself => "self",
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Son => "son",
            Self::Daughter => "daughter",
            Self::Grandfather => "grandfather",
            Self::Grandmother => "grandmother",
            Self::GreatGrandfather => "great-grandfather",
            Self::GreatGrandmother => "great-grandmother",
            Self::GreatGreatGrandfather => "great-great-grandfather",
            Self::GreatGreatGrandmother => "great-great-grandmother",
            Self::Grandson => "grandson",
            Self::Granddaughter => "granddaughter",
            Self::GreatGrandson => "great-grandson",
            Self::GreatGranddaughter => "great-granddaughter",
            Self::GreatGreatGrandson => "great-great-grandson",
            Self::GreatGreatGranddaughter => "great-great-granddaughter",
            Self::Brother => "brother",
            Self::Sister => "sister",
            Self::Husband => "husband",
            Self::Wife => "wife",
            Self::PaternalUncle => "paternal-uncle",
            Self::MaternalUncle => "maternal-uncle",
            Self::PaternalAunt => "paternal-aunt",
            Self::MaternalAunt => "maternal-aunt",
            Self::NephewThroughBrother => "nephew-through-brother",
            Self::NieceThroughBrother => "niece-through-brother",
            Self::NephewThroughSister => "nephew-through-sister",
            Self::NieceThroughSister => "niece-through-sister",
            Self::MaleCousinThroughPaternalUncle => "male-cousin-through-paternal-uncle",
            Self::MaleCousinThroughPaternalAunt => "male-cousin-through-paternal-aunt",
            Self::MaleCousinThroughMaternalUncle => "male-cousin-through-maternal-uncle",
            Self::MaleCousinThroughMaternalAunt => "male-cousin-through-maternal-aunt",
            Self::FemaleCousinThroughPaternalUncle => "female-cousin-through-paternal-uncle",
            Self::FemaleCousinThroughPaternalAunt => "female-cousin-through-paternal-aunt",
            Self::FemaleCousinThroughMaternalUncle => "female-cousin-through-maternal-uncle",
            Self::FemaleCousinThroughMaternalAunt => "female-cousin-through-maternal-aunt",
            Self::Distant => "distant",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of B's parents the connecting branch goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Paternal,
    Maternal,
}

fn gendered(sex: Sex, male: Relation, female: Relation) -> Relation {
    match sex {
        Sex::Male => male,
        Sex::Female => female,
        Sex::Unknown => Relation::Unknown,
    }
}

fn ancestor_relation(sex: Sex, depth: usize) -> Relation {
    use Relation::*;
    match depth {
        1 => gendered(sex, Father, Mother),
        2 => gendered(sex, Grandfather, Grandmother),
        3 => gendered(sex, GreatGrandfather, GreatGrandmother),
        4 => gendered(sex, GreatGreatGrandfather, GreatGreatGrandmother),
        _ if sex == Sex::Unknown => Unknown,
        _ => Distant,
    }
}

fn descendant_relation(sex: Sex, depth: usize) -> Relation {
    use Relation::*;
    match depth {
        1 => gendered(sex, Son, Daughter),
        2 => gendered(sex, Grandson, Granddaughter),
        3 => gendered(sex, GreatGrandson, GreatGranddaughter),
        4 => gendered(sex, GreatGreatGrandson, GreatGreatGranddaughter),
        _ if sex == Sex::Unknown => Unknown,
        _ => Distant,
    }
}

fn cousin_relation(a: Sex, branch: Branch, a_parent: Sex) -> Relation {
    use Branch::*;
    use Relation::*;
    match (a, branch, a_parent) {
        (Sex::Male, Paternal, Sex::Male) => MaleCousinThroughPaternalUncle,
        (Sex::Male, Paternal, Sex::Female) => MaleCousinThroughPaternalAunt,
        (Sex::Male, Maternal, Sex::Male) => MaleCousinThroughMaternalUncle,
        (Sex::Male, Maternal, Sex::Female) => MaleCousinThroughMaternalAunt,
        (Sex::Female, Paternal, Sex::Male) => FemaleCousinThroughPaternalUncle,
        (Sex::Female, Paternal, Sex::Female) => FemaleCousinThroughPaternalAunt,
        (Sex::Female, Maternal, Sex::Male) => FemaleCousinThroughMaternalUncle,
        (Sex::Female, Maternal, Sex::Female) => FemaleCousinThroughMaternalAunt,
        _ => Unknown,
    }
}

impl FamilyGraph {
    fn member_chain(&self, start: PersonIdx) -> Vec<PersonIdx> {
        let cap = WalkCap::Configured(self.config.kinship_step_cap);
        self.walk_up(start, cap, |idx| self.member_parent_idx(idx))
    }

    /// Finds the lowest common ancestor of A and B and the shape around it.
    ///
    /// Returns `None` if either id is unknown or the chains never meet.
    pub fn kinship_of(&self, a: &str, b: &str) -> Option<Kinship<'_>> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        let person_a = &self.graph[ia];
        let person_b = &self.graph[ib];

        if ia == ib {
            return Some(Kinship {
                person_a,
                person_b,
                common: person_a,
                depth_a: 0,
                depth_b: 0,
                a_first_up: None,
                b_first_up: None,
                path: Vec::new(),
            });
        }

        let up_a = self.member_chain(ia);
        let up_b = self.member_chain(ib);

        let depth_in_a: HashMap<PersonIdx, usize> =
            up_a.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();

        let (depth_b, depth_a) = up_b
            .iter()
            .enumerate()
            .find_map(|(j, idx)| depth_in_a.get(idx).map(|&i| (j, i)))?;

        let mut path: Vec<&Person> = Vec::new();
        if depth_a > 1 {
            path.extend(up_a[1..depth_a].iter().map(|&h| &self.graph[h]));
        }
        if depth_b > 1 {
            path.extend(up_b[1..depth_b].iter().rev().map(|&h| &self.graph[h]));
        }

        Some(Kinship {
            person_a,
            person_b,
            common: &self.graph[up_b[depth_b]],
            depth_a,
            depth_b,
            a_first_up: self.first_up(&up_a, depth_a),
            b_first_up: self.first_up(&up_b, depth_b),
            path,
        })
    }

    /// Names A's relation to B.
    ///
    /// Spouses are recognised before any ancestor logic. Returns `None` when
    /// either id is unknown or the two share no member ancestor; `Distant`
    /// when they do but beyond the configured depth; `Unknown` when the
    /// pattern has no name or the sex data needed to pick one is missing.
    pub fn relation_of(&self, a: &str, b: &str) -> Option<Relation> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        let sex_a = self.graph[ia].sex;

        if ia == ib {
            return Some(Relation::Myself);
        }
        if self.spouse_handles(ia).contains(&ib) {
            return Some(gendered(sex_a, Relation::Husband, Relation::Wife));
        }

        let kin = self.kinship_of(a, b)?;
        let (da, db) = (kin.depth_a, kin.depth_b);
        let max = self.config.max_kinship_depth;

        if da > max || db > max {
            return Some(Relation::Distant);
        }
        if da == 0 && db > 0 {
            return Some(ancestor_relation(sex_a, db));
        }
        if db == 0 && da > 0 {
            return Some(descendant_relation(sex_a, da));
        }

        if let (Some(pa), Some(pb)) = (self.member_parent_idx(ia), self.member_parent_idx(ib)) {
            if pa == pb {
                return Some(gendered(sex_a, Relation::Brother, Relation::Sister));
            }
        }

        let a_up = kin.a_first_up;
        let b_up = kin.b_first_up;

        // A is a sibling of B's parent
        if da == 1 && db == 2 {
            if let Some(b_up) = b_up {
                let Some(branch) = self.branch_of(ib, b_up) else {
                    return Some(Relation::Unknown);
                };
                return Some(match branch {
                    Branch::Paternal => {
                        gendered(sex_a, Relation::PaternalUncle, Relation::PaternalAunt)
                    }
                    Branch::Maternal => {
                        gendered(sex_a, Relation::MaternalUncle, Relation::MaternalAunt)
                    }
                });
            }
        }

        // A is a child of B's sibling
        if da == 2 && db == 1 {
            if let Some(a_up) = a_up {
                return Some(match (a_up.sex, sex_a) {
                    (Sex::Male, Sex::Male) => Relation::NephewThroughBrother,
                    (Sex::Male, Sex::Female) => Relation::NieceThroughBrother,
                    (Sex::Female, Sex::Male) => Relation::NephewThroughSister,
                    (Sex::Female, Sex::Female) => Relation::NieceThroughSister,
                    _ => Relation::Unknown,
                });
            }
        }

        if da >= 2 && db >= 2 {
            if let (Some(a_up), Some(b_up)) = (a_up, b_up) {
                let Some(branch) = self.branch_of(ib, b_up) else {
                    return Some(Relation::Unknown);
                };
                return Some(cousin_relation(sex_a, branch, a_up.sex));
            }
        }

        Some(Relation::Unknown)
    }

    fn first_up(&self, chain: &[PersonIdx], depth: usize) -> Option<&Person> {
        if depth == 0 {
            return None;
        }
        chain.get(1).map(|&h| &self.graph[h])
    }

    /// Whether `up` is `child`'s father or mother.
    fn branch_of(&self, child: PersonIdx, up: &Person) -> Option<Branch> {
        let up = self.index_of(&up.id)?;
        if self.father_idx(child) == Some(up) {
            Some(Branch::Paternal)
        } else if self.mother_idx(child) == Some(up) {
            Some(Branch::Maternal)
        } else {
            None
        }
    }
}
