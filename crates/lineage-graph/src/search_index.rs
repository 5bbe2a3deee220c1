//! Search index for person lookup by name and birth date.
//!
//! Names are normalized once when the graph is built, so a query only has to
//! normalize its own tokens. A query is either free text (treated as a
//! fullname) or a set of `key:value` tokens whose keys may be written in
//! English, French or Arabic.
//!
//! Every structured field is a hard filter; the survivors are scored so that
//! exact matches beat prefix matches and specific fields beat vague ones.

use crate::edge::Edge;
use crate::graph::{FamilyGraph, PersonIdx};
use lineage_core::Person;
use once_cell::sync::Lazy;
use petgraph::graph::DiGraph;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical field a query key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Fullname,
    Firstname,
    Lastname,
    Birth,
}

static ALIASES: Lazy<HashMap<String, Field>> = Lazy::new(|| {
    let groups: [(Field, &[&str]); 4] = [
        (Field::Fullname, &["fullname", "full", "name"]),
        (
            Field::Firstname,
            &["firstname", "first", "prénom", "prenom", "الاسم", "الإسم"],
        ),
        (
            Field::Lastname,
            &["lastname", "last", "surname", "nom", "لقب", "اللقب"],
        ),
        (
            Field::Birth,
            &["birth", "born", "dob", "naissance", "né", "née", "ميلاد", "الميلاد"],
        ),
    ];
    let mut map = HashMap::new();
    for (field, words) in groups {
        for word in words {
            map.insert(normalize(word), field);
        }
    }
    map
});

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)([\p{L}\p{N}_.-]+)\s*[:=]").expect("valid key regex"));

static DMY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([0-9]{1,2})[./-]([0-9]{1,2})[./-]([0-9]{2,4})\b").expect("valid date regex")
});
static YMD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([0-9]{4})[./-]([0-9]{1,2})[./-]([0-9]{1,2})\b").expect("valid date regex")
});
static MY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{1,2})[./-]([0-9]{4})\b").expect("valid date regex"));
static YM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{4})[./-]([0-9]{1,2})\b").expect("valid date regex"));
static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(1[6-9][0-9]{2}|20[0-9]{2})\b").expect("valid year regex"));

/// Maps Arabic-Indic and Persian digits to ASCII.
pub fn to_latin_digits(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

/// Folds text for comparison.
///
/// Strips diacritics, maps non-Latin digits to ASCII, lowercases, turns
/// punctuation (apostrophes excepted) into spaces and collapses whitespace.
pub fn normalize(s: &str) -> String {
    let folded: String = s
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(to_latin_digits)
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parsed search query. Absent fields don't filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub fullname: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub birth_year: Option<i32>,
    pub birth_month: Option<u32>,
    pub birth_day: Option<u32>,
}

impl SearchQuery {
    /// Tokenizes free text.
    ///
    /// Recognized `key:value` (or `key=value`) pairs fill their fields; the
    /// first value for a field wins. With no recognized key, the whole input
    /// is a fullname search.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let mut out = SearchQuery::default();
        if input.is_empty() {
            return out;
        }

        let keys: Vec<_> = KEY_RE.captures_iter(input).collect();
        let mut saw_key = false;

        for (i, caps) in keys.iter().enumerate() {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value_end = keys
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(input.len(), |m| m.start());
            let value = input[whole.end()..value_end].trim();
            if value.is_empty() {
                continue;
            }
            let Some(&field) = ALIASES.get(&normalize(key.as_str())) else {
                continue;
            };
            saw_key = true;

            match field {
                Field::Fullname => set_once(&mut out.fullname, value.to_string()),
                Field::Firstname => set_once(&mut out.firstname, value.to_string()),
                Field::Lastname => set_once(&mut out.lastname, value.to_string()),
                Field::Birth => {
                    let (year, month, day) = parse_birth(value);
                    if let Some(d) = day {
                        set_once(&mut out.birth_day, d);
                    }
                    if let Some(m) = month {
                        set_once(&mut out.birth_month, m);
                    }
                    if let Some(y) = year {
                        set_once(&mut out.birth_year, y);
                    }
                }
            }
        }

        if !saw_key {
            out.fullname = Some(input.to_string());
        }
        out
    }

    /// True if no field would filter anything.
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none()
            && self.firstname.is_none()
            && self.lastname.is_none()
            && self.birth_year.is_none()
            && self.birth_month.is_none()
            && self.birth_day.is_none()
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Parses a birth value into (year, month, day).
///
/// Accepts `dd/mm/yyyy`, `yyyy/mm/dd`, `mm/yyyy`, `yyyy/mm` and a bare
/// year; `.` and `-` work as separators too. Two-digit years are 19xx.
pub fn parse_birth(value: &str) -> (Option<i32>, Option<u32>, Option<u32>) {
    let s: String = value.trim().chars().map(to_latin_digits).collect();
    let positive = |n: Option<u32>| n.filter(|&n| n > 0);

    if let Some(caps) = DMY_RE.captures(&s) {
        let raw_year = caps.get(3).map_or("", |m| m.as_str());
        let year = if raw_year.len() == 2 {
            format!("19{}", raw_year).parse::<i32>().ok()
        } else {
            raw_year.parse::<i32>().ok()
        };
        return (year, positive(num(&caps, 2)), positive(num(&caps, 1)));
    }
    if let Some(caps) = YMD_RE.captures(&s) {
        let year = num(&caps, 1).map(|y| y as i32);
        return (year, positive(num(&caps, 2)), positive(num(&caps, 3)));
    }
    if let Some(caps) = MY_RE.captures(&s) {
        let year = num(&caps, 2).map(|y| y as i32);
        return (year, positive(num(&caps, 1)), None);
    }
    if let Some(caps) = YM_RE.captures(&s) {
        let year = num(&caps, 1).map(|y| y as i32);
        return (year, positive(num(&caps, 2)), None);
    }
    if let Some(caps) = YEAR_RE.captures(&s) {
        return (num(&caps, 1).map(|y| y as i32), None, None);
    }
    (None, None, None)
}

fn num(caps: &Captures<'_>, i: usize) -> Option<u32> {
    caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok())
}

/// One person's pre-normalized search keys.
#[derive(Debug, Clone)]
struct IndexedPerson {
    idx: PersonIdx,
    first: String,
    last: String,
    full: String,
    birth_year: Option<i32>,
    birth_month: Option<u32>,
    birth_day: Option<u32>,
}

/// Exact > prefix > present.
fn name_score(candidate: &str, needle: &str, exact: u32, prefix: u32, present: u32) -> u32 {
    if candidate == needle {
        exact
    } else if candidate.starts_with(needle) {
        prefix
    } else {
        present
    }
}

/// Normalized name index over every person in the graph.
#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    /// Insertion-ordered entries, scanned per query.
    entries: Vec<IndexedPerson>,
    /// Maps normalized fullnames to the persons bearing them.
    exact_index: HashMap<String, Vec<PersonIdx>>,
}

impl SearchIndex {
    /// Indexes every person of the arena.
    pub fn build(persons: &DiGraph<Person, Edge>) -> Self {
        let mut index = SearchIndex::default();
        for idx in persons.node_indices() {
            index.insert(idx, &persons[idx]);
        }
        index
    }

    fn insert(&mut self, idx: PersonIdx, person: &Person) {
        let full = normalize(person.fullname.as_deref().unwrap_or(""));
        if !full.is_empty() {
            self.exact_index.entry(full.clone()).or_default().push(idx);
        }
        self.entries.push(IndexedPerson {
            idx,
            first: normalize(person.firstname.as_deref().unwrap_or("")),
            last: normalize(person.lastname.as_deref().unwrap_or("")),
            full,
            birth_year: person.birth_year,
            birth_month: person.birth_month,
            birth_day: person.birth_day,
        });
    }

    /// Persons whose normalized fullname equals `name`'s.
    pub fn exact(&self, name: &str) -> &[PersonIdx] {
        self.exact_index
            .get(&normalize(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Filters and scores every entry, best first. Ties keep insertion order.
    pub fn query(&self, query: &SearchQuery) -> Vec<(PersonIdx, u32)> {
        let norm_opt = |s: &Option<String>| {
            s.as_deref()
                .map(normalize)
                .filter(|n| !n.is_empty())
        };
        let first = norm_opt(&query.firstname);
        let last = norm_opt(&query.lastname);
        let full = norm_opt(&query.fullname);

        if first.is_none()
            && last.is_none()
            && full.is_none()
            && query.birth_year.is_none()
            && query.birth_month.is_none()
            && query.birth_day.is_none()
        {
            return Vec::new();
        }

        let mut results: Vec<(PersonIdx, u32)> = Vec::new();
        for entry in &self.entries {
            // Hard filters
            if first.as_ref().is_some_and(|f| !entry.first.starts_with(f.as_str())) {
                continue;
            }
            if last.as_ref().is_some_and(|l| !entry.last.starts_with(l.as_str())) {
                continue;
            }
            if full.as_ref().is_some_and(|f| !entry.full.starts_with(f.as_str())) {
                continue;
            }
            if query.birth_year.is_some() && entry.birth_year != query.birth_year {
                continue;
            }
            if query.birth_month.is_some() && entry.birth_month != query.birth_month {
                continue;
            }
            if query.birth_day.is_some() && entry.birth_day != query.birth_day {
                continue;
            }

            // Scoring
            let mut score = 0;
            if let Some(f) = &first {
                score += name_score(&entry.first, f, 6, 4, 2);
            }
            if let Some(l) = &last {
                score += name_score(&entry.last, l, 6, 4, 2);
            }
            if let Some(f) = &full {
                score += name_score(&entry.full, f, 5, 3, 1);
            }
            if query.birth_year.is_some() {
                score += 2;
            }
            if query.birth_month.is_some() {
                score += 2;
            }
            if query.birth_day.is_some() {
                score += 3;
            }
            results.push((entry.idx, score));
        }

        results.sort_by(|a, b| b.1.cmp(&a.1));
        results
    }

    /// Returns the number of indexed persons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit<'g> {
    pub id: &'g str,
    pub score: u32,
}

impl FamilyGraph {
    /// Ranked hits for a parsed query.
    pub fn search_scored(&self, query: &SearchQuery) -> Vec<SearchHit<'_>> {
        self.search_index
            .query(query)
            .into_iter()
            .map(|(idx, score)| SearchHit {
                id: self.graph[idx].id.as_str(),
                score,
            })
            .collect()
    }

    /// Ranked ids for a parsed query.
    pub fn search(&self, query: &SearchQuery) -> Vec<&str> {
        self.search_scored(query).into_iter().map(|h| h.id).collect()
    }

    /// Parses free text and searches.
    pub fn search_text(&self, input: &str) -> Vec<&str> {
        self.search(&SearchQuery::parse(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Éléonore   D'Arc! "), "eleonore d'arc");
        assert_eq!(normalize("Zlitni-Ben_Ali"), "zlitni ben ali");
        assert_eq!(normalize("١٩٥٠"), "1950");
        assert_eq!(normalize("۱۹۵۰"), "1950");
        assert_eq!(normalize("الإسم"), normalize("الاسم"));
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parse_free_text_is_fullname() {
        let q = SearchQuery::parse("  Ahmed Zlitni ");
        assert_eq!(q.fullname.as_deref(), Some("Ahmed Zlitni"));
        assert!(q.firstname.is_none());
    }

    #[test]
    fn test_parse_keys() {
        let q = SearchQuery::parse("firstname:Ahmed lastname = Zlitni birth:12/03/1950");
        assert_eq!(q.firstname.as_deref(), Some("Ahmed"));
        assert_eq!(q.lastname.as_deref(), Some("Zlitni"));
        assert_eq!(q.birth_year, Some(1950));
        assert_eq!(q.birth_month, Some(3));
        assert_eq!(q.birth_day, Some(12));
        assert!(q.fullname.is_none());
    }

    #[test]
    fn test_parse_multi_word_values() {
        let q = SearchQuery::parse("nom:Ben Ali prénom:Fatma Zahra");
        assert_eq!(q.lastname.as_deref(), Some("Ben Ali"));
        assert_eq!(q.firstname.as_deref(), Some("Fatma Zahra"));
    }

    #[test]
    fn test_parse_arabic_keys() {
        let q = SearchQuery::parse("الإسم:أحمد ميلاد:١٩٥٠");
        assert_eq!(q.firstname.as_deref(), Some("أحمد"));
        assert_eq!(q.birth_year, Some(1950));
    }

    #[test]
    fn test_parse_first_value_wins() {
        let q = SearchQuery::parse("first:Ali first:Omar");
        assert_eq!(q.firstname.as_deref(), Some("Ali"));
    }

    #[test]
    fn test_parse_unknown_key_falls_back_to_fullname() {
        let q = SearchQuery::parse("color:blue");
        assert_eq!(q.fullname.as_deref(), Some("color:blue"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(SearchQuery::parse("   ").is_empty());
    }

    #[test]
    fn test_parse_birth_forms() {
        assert_eq!(parse_birth("12/03/1950"), (Some(1950), Some(3), Some(12)));
        assert_eq!(parse_birth("12-03-50"), (Some(1950), Some(3), Some(12)));
        assert_eq!(parse_birth("1950.03.12"), (Some(1950), Some(3), Some(12)));
        assert_eq!(parse_birth("03/1950"), (Some(1950), Some(3), None));
        assert_eq!(parse_birth("1950-03"), (Some(1950), Some(3), None));
        assert_eq!(parse_birth("1950"), (Some(1950), None, None));
        assert_eq!(parse_birth("٠٣/١٩٥٠"), (Some(1950), Some(3), None));
        assert_eq!(parse_birth("someday"), (None, None, None));
    }

    fn people() -> FamilyGraph {
        FamilyGraph::from_rows(
            &[
                born(male("a1", "Ahmed", "Zlitni"), 1950, Some(3), Some(12)),
                born(male("a2", "Ahmed", "Zlitni"), 1950, Some(7), None),
                born(male("a3", "Ahmedou", "Zlitni"), 1962, None, None),
                born(female("f1", "Fatma", "Ben Ali"), 1950, Some(3), None),
                male("z", "Éric", "Zlitnia"),
            ],
            &[],
            &[],
            config(),
        )
    }

    #[test]
    fn test_firstname_prefix_filter() {
        let g = people();
        let ids = g.search_text("firstname:Ahmed");
        assert_eq!(ids.len(), 3);
        // exact firstname matches outrank the prefix match
        assert_eq!(ids[2], "a3");
    }

    #[test]
    fn test_fullname_exact_ranks_first() {
        let g = people();
        let hits = g.search_scored(&SearchQuery::parse("Ahmed Zlitni"));
        let ids: Vec<&str> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["a1", "a2"]);

        let hits = g.search_scored(&SearchQuery::parse("zlit"));
        assert!(hits.is_empty());

        let ids = g.search_text("Ahmed");
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_diacritics_are_ignored() {
        let g = people();
        assert_eq!(g.search_text("eric"), vec!["z"]);
        assert_eq!(g.search_text("first:ÉRIC"), vec!["z"]);
    }

    #[test]
    fn test_birth_filters() {
        let g = people();
        let mut year = g.search_text("birth:1950");
        year.sort();
        assert_eq!(year, vec!["a1", "a2", "f1"]);

        let mut month = g.search_text("birth:03/1950");
        month.sort();
        assert_eq!(month, vec!["a1", "f1"]);

        assert_eq!(g.search_text("birth:12/03/1950"), vec!["a1"]);
        assert!(g.search_text("birth:1951").is_empty());
    }

    #[test]
    fn test_combined_filters_score_higher() {
        let g = people();
        let hits = g.search_scored(&SearchQuery::parse("first:Ahmed birth:03/1950"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a1");
        assert_eq!(hits[0].score, 6 + 2 + 2);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let g = people();
        assert!(g.search(&SearchQuery::default()).is_empty());
        assert!(g.search_text("first:!!!").is_empty());
    }

    #[test]
    fn test_exact_index() {
        let g = people();
        assert_eq!(g.search_index.exact("ahmed  ZLITNI").len(), 2);
        assert!(g.search_index.exact("nobody").is_empty());
        assert_eq!(g.search_index.len(), 5);
    }
}
