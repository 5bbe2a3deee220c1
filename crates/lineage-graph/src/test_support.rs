//! Row builders shared by unit tests.

use crate::FamilyGraph;
use lineage_core::{FiliationRow, LineageConfig, PersonRow, UnionRow};

pub fn config() -> LineageConfig {
    LineageConfig::default()
        .with_sentinel("Zlitni")
        .with_reference_year(2024)
}

fn person(id: &str, is_male: Option<bool>, first: &str, last: Option<&str>) -> PersonRow {
    PersonRow {
        id: Some(id.to_string()),
        is_male,
        firstname: Some(first.to_string()),
        lastname: last.map(str::to_string),
        ..Default::default()
    }
}

pub fn male(id: &str, first: &str, last: &str) -> PersonRow {
    person(id, Some(true), first, Some(last))
}

pub fn female(id: &str, first: &str, last: &str) -> PersonRow {
    person(id, Some(false), first, Some(last))
}

pub fn unknown(id: &str, first: &str) -> PersonRow {
    person(id, None, first, None)
}

pub fn born(mut row: PersonRow, year: i32, month: Option<u32>, day: Option<u32>) -> PersonRow {
    row.birth_year = Some(year);
    row.birth_month = month;
    row.birth_day = day;
    row
}

pub fn union(id: &str, a: Option<&str>, b: Option<&str>) -> UnionRow {
    UnionRow {
        id: Some(id.to_string()),
        partner_a_id: a.map(str::to_string),
        partner_b_id: b.map(str::to_string),
    }
}

pub fn filiation(child: &str, union_id: &str) -> FiliationRow {
    FiliationRow {
        child_id: Some(child.to_string()),
        spouse_link_id: Some(union_id.to_string()),
    }
}

/// Three generations: gf+gm -> dad; dad+mom -> me, sis. Mom married in.
pub fn family() -> FamilyGraph {
    FamilyGraph::from_rows(
        &[
            male("gf", "Salem", "Zlitni"),
            female("gm", "Khadija", "Gharbi"),
            male("dad", "Omar", "Zlitni"),
            female("mom", "Fatma", "Ben Ali"),
            male("me", "Sami", "Zlitni"),
            female("sis", "Mariem", "Zlitni"),
        ],
        &[
            union("u1", Some("gf"), Some("gm")),
            union("u2", Some("dad"), Some("mom")),
        ],
        &[
            filiation("dad", "u1"),
            filiation("me", "u2"),
            filiation("sis", "u2"),
        ],
        config(),
    )
}

/// Four generations under one root, with in-laws on both sides.
///
/// ```text
/// root + rootw
/// ├── uncle + uw ──> cousin_m, cousin_f
/// ├── aunt + ah ───> acousin
/// └── dad + mom ───> me, sis, kid_x (sex unknown)
///                    me + wife_me ──> son
///                                    son + swife ──> grandson
/// ```
pub fn clan() -> FamilyGraph {
    clan_with(config())
}

pub fn clan_with(config: LineageConfig) -> FamilyGraph {
    FamilyGraph::from_rows(
        &[
            male("root", "Salem", "Zlitni"),
            female("rootw", "Khadija", "Gharbi"),
            male("uncle", "Ali", "Zlitni"),
            female("uw", "Amel", "Jaziri"),
            female("aunt", "Zohra", "Zlitni"),
            male("ah", "Karim", "Trabelsi"),
            male("dad", "Omar", "Zlitni"),
            female("mom", "Fatma", "Ben Ali"),
            male("cousin_m", "Hedi", "Zlitni"),
            female("cousin_f", "Nour", "Zlitni"),
            male("acousin", "Youssef", "Trabelsi"),
            male("me", "Sami", "Zlitni"),
            female("sis", "Mariem", "Zlitni"),
            unknown("kid_x", "Rayen"),
            female("wife_me", "Ines", "Mabrouk"),
            male("son", "Adam", "Zlitni"),
            female("swife", "Lina", "Saidi"),
            male("grandson", "Iyed", "Zlitni"),
        ],
        &[
            union("u_root", Some("root"), Some("rootw")),
            union("u_uncle", Some("uncle"), Some("uw")),
            union("u_aunt", Some("ah"), Some("aunt")),
            union("u_dad", Some("dad"), Some("mom")),
            union("u_me", Some("me"), Some("wife_me")),
            union("u_son", Some("son"), Some("swife")),
        ],
        &[
            filiation("uncle", "u_root"),
            filiation("aunt", "u_root"),
            filiation("dad", "u_root"),
            filiation("cousin_m", "u_uncle"),
            filiation("cousin_f", "u_uncle"),
            filiation("acousin", "u_aunt"),
            filiation("me", "u_dad"),
            filiation("sis", "u_dad"),
            filiation("kid_x", "u_dad"),
            filiation("son", "u_me"),
            filiation("grandson", "u_son"),
        ],
        config,
    )
}
