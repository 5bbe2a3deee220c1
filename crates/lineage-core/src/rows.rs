//! Raw rows as delivered by the data source.
//!
//! Every field is optional at decode time. Structural problems (a collection
//! that is not an array) fail the whole decode. A row whose fields have the
//! wrong type is dropped on its own; other row-level problems (a missing id,
//! a dangling reference) are left for the graph builder to drop.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// One person record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRow {
    pub id: Option<String>,
    pub is_male: Option<bool>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub is_alive: Option<bool>,
    pub birth_year: Option<i32>,
    pub birth_month: Option<u32>,
    pub birth_day: Option<u32>,
    pub death_year: Option<i32>,
    pub death_month: Option<u32>,
    pub death_day: Option<u32>,
    pub birth_place: Option<String>,
    pub birth_country: Option<String>,
}

/// A union between two people. Either side may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnionRow {
    pub id: Option<String>,
    pub partner_a_id: Option<String>,
    pub partner_b_id: Option<String>,
}

/// Links a child to the union it was born of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiliationRow {
    pub child_id: Option<String>,
    pub spouse_link_id: Option<String>,
}

/// The three row collections a graph is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub persons: Vec<PersonRow>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spouse_links: Vec<UnionRow>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub child_links: Vec<FiliationRow>,
}

impl Snapshot {
    /// Decodes a snapshot from JSON.
    ///
    /// Accepts the bare `{ persons, spouse_links, child_links }` object or the
    /// fetch envelope `{ "data": { ... } }`.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let inner = match value {
            Value::Object(mut map) if map.contains_key("data") => match map.remove("data") {
                Some(Value::Null) | None => return Ok(Self::default()),
                Some(data) => data,
            },
            other => other,
        };
        let mut map: Map<String, Value> = serde_json::from_value(inner)?;

        Ok(Self {
            persons: take_rows(&mut map, "persons")?,
            spouse_links: take_rows(&mut map, "spouse_links")?,
            child_links: take_rows(&mut map, "child_links")?,
        })
    }

    /// Reads and decodes a snapshot file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.spouse_links.is_empty() && self.child_links.is_empty()
    }
}

/// Decodes one collection row by row. A missing or null collection is empty;
/// anything else that is not an array is an error.
fn take_rows<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Result<Vec<T>> {
    let items: Vec<Value> = match map.remove(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(items) => serde_json::from_value(items)?,
    };

    let rows: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(row) => Some(row),
            Err(e) => {
                debug!("Dropping {} row {}: {}", key, i, e);
                None
            }
        })
        .collect();
    Ok(rows)
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
