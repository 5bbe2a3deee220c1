//! The Person value type.
//!
//! A `Person` is built once from a row and never changes. Derived fields
//! (`fullname`, `lifespan`, `age`) are computed in the constructor so every
//! consumer sees the same rendering.

use crate::rows::PersonRow;
use serde::{Deserialize, Serialize};

/// Tri-state sex flag. Rows may leave it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Maps the nullable `is_male` column.
    pub fn from_is_male(is_male: Option<bool>) -> Self {
        match is_male {
            Some(true) => Sex::Male,
            Some(false) => Sex::Female,
            None => Sex::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Sex::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable demographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Opaque identifier, unique across the person collection.
    pub id: String,
    pub sex: Sex,
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

    // Derived once in the constructor.
    pub fullname: Option<String>,
    pub lifespan: Option<String>,
    pub age: Option<i32>,
}

impl Person {
    /// Builds a person from a row.
    ///
    /// `reference_year` stands in for the death year when computing the age
    /// of someone with no recorded death.
    pub fn from_row(id: impl Into<String>, row: &PersonRow, reference_year: i32) -> Self {
        let firstname = capitalize(row.firstname.as_deref());
        let lastname = capitalize(row.lastname.as_deref());

        let fullname = match (&firstname, &lastname) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(l)) => Some(l.clone()),
            (None, None) => None,
        };

        let lifespan = match (row.birth_year, row.death_year) {
            (Some(b), Some(d)) => Some(format!("{} – {}", b, d)),
            (Some(b), None) => Some(b.to_string()),
            (None, Some(d)) => Some(format!("– {}", d)),
            (None, None) => None,
        };

        // Years out of arithmetic range leave the age unknown.
        let age = row
            .birth_year
            .and_then(|b| row.death_year.unwrap_or(reference_year).checked_sub(b))
            .map(|a| a.max(0));

        Self {
            id: id.into(),
            sex: Sex::from_is_male(row.is_male),
            firstname,
            lastname,
            is_alive: row.is_alive,
            birth_year: row.birth_year,
            birth_month: row.birth_month,
            birth_day: row.birth_day,
            death_year: row.death_year,
            death_month: row.death_month,
            death_day: row.death_day,
            birth_place: trimmed(row.birth_place.as_deref()),
            birth_country: trimmed(row.birth_country.as_deref()),
            fullname,
            lifespan,
            age,
        }
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    pub fn is_female(&self) -> bool {
        self.sex == Sex::Female
    }

    pub fn has_sex(&self) -> bool {
        self.sex.is_known()
    }
    pub fn has_firstname(&self) -> bool {
        self.firstname.is_some()
    }
    pub fn has_lastname(&self) -> bool {
        self.lastname.is_some()
    }
    pub fn has_fullname(&self) -> bool {
        self.fullname.is_some()
    }
    pub fn has_is_alive(&self) -> bool {
        self.is_alive.is_some()
    }
    pub fn has_birth_year(&self) -> bool {
        self.birth_year.is_some()
    }
    pub fn has_birth_month(&self) -> bool {
        self.birth_month.is_some()
    }
    pub fn has_birth_day(&self) -> bool {
        self.birth_day.is_some()
    }
    pub fn has_death_year(&self) -> bool {
        self.death_year.is_some()
    }
    pub fn has_death_month(&self) -> bool {
        self.death_month.is_some()
    }
    pub fn has_death_day(&self) -> bool {
        self.death_day.is_some()
    }
    pub fn has_birth_place(&self) -> bool {
        self.birth_place.is_some()
    }
    pub fn has_birth_country(&self) -> bool {
        self.birth_country.is_some()
    }
    pub fn has_age(&self) -> bool {
        self.age.is_some()
    }
    pub fn has_lifespan(&self) -> bool {
        self.lifespan.is_some()
    }

    /// True when nothing but the id is known.
    pub fn is_empty(&self) -> bool {
        !(self.has_sex()
            || self.has_firstname()
            || self.has_lastname()
            || self.has_is_alive()
            || self.has_birth_year()
            || self.has_birth_month()
            || self.has_birth_day()
            || self.has_death_year()
            || self.has_death_month()
            || self.has_death_day()
            || self.has_birth_place()
            || self.has_birth_country())
    }

    /// Fullname for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.fullname.as_deref().unwrap_or(&self.id)
    }
}

fn trimmed(s: Option<&str>) -> Option<String> {
    let t = s?.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Trims and upper-cases the first character.
fn capitalize(s: Option<&str>) -> Option<String> {
    let t = trimmed(s)?;
    let mut chars = t.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PersonRow {
        PersonRow {
            id: Some("1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_names_are_trimmed_and_capitalized() {
        let r = PersonRow {
            firstname: Some("  ahmed ".into()),
            lastname: Some("zlitni".into()),
            ..row()
        };
        let p = Person::from_row("1", &r, 2024);
        assert_eq!(p.firstname.as_deref(), Some("Ahmed"));
        assert_eq!(p.lastname.as_deref(), Some("Zlitni"));
        assert_eq!(p.fullname.as_deref(), Some("Ahmed Zlitni"));
    }

    #[test]
    fn test_blank_names_are_absent() {
        let r = PersonRow {
            firstname: Some("   ".into()),
            ..row()
        };
        let p = Person::from_row("1", &r, 2024);
        assert!(p.firstname.is_none());
        assert!(p.fullname.is_none());
        assert_eq!(p.display_name(), "1");
    }

    #[test]
    fn test_single_name_fullname() {
        let r = PersonRow {
            lastname: Some("Zlitni".into()),
            ..row()
        };
        let p = Person::from_row("1", &r, 2024);
        assert_eq!(p.fullname.as_deref(), Some("Zlitni"));
    }

    #[test]
    fn test_lifespan_variants() {
        let both = PersonRow {
            birth_year: Some(1920),
            death_year: Some(1990),
            ..row()
        };
        let birth_only = PersonRow {
            birth_year: Some(1920),
            ..row()
        };
        let death_only = PersonRow {
            death_year: Some(1990),
            ..row()
        };

        assert_eq!(
            Person::from_row("1", &both, 2024).lifespan.as_deref(),
            Some("1920 – 1990")
        );
        assert_eq!(
            Person::from_row("1", &birth_only, 2024).lifespan.as_deref(),
            Some("1920")
        );
        assert_eq!(
            Person::from_row("1", &death_only, 2024).lifespan.as_deref(),
            Some("– 1990")
        );
        assert!(Person::from_row("1", &row(), 2024).lifespan.is_none());
    }

    #[test]
    fn test_age() {
        let dead = PersonRow {
            birth_year: Some(1920),
            death_year: Some(1990),
            ..row()
        };
        let living = PersonRow {
            birth_year: Some(1950),
            ..row()
        };
        let bad = PersonRow {
            birth_year: Some(2000),
            death_year: Some(1990),
            ..row()
        };

        assert_eq!(Person::from_row("1", &dead, 2024).age, Some(70));
        assert_eq!(Person::from_row("1", &living, 2024).age, Some(74));
        assert_eq!(Person::from_row("1", &bad, 2024).age, Some(0));
        assert_eq!(Person::from_row("1", &row(), 2024).age, None);
    }

    #[test]
    fn test_age_with_extreme_years() {
        let ancient = PersonRow {
            birth_year: Some(i32::MIN),
            ..row()
        };
        let future = PersonRow {
            birth_year: Some(i32::MAX),
            ..row()
        };
        let wrapped = PersonRow {
            birth_year: Some(i32::MAX),
            death_year: Some(i32::MIN),
            ..row()
        };

        assert_eq!(Person::from_row("1", &ancient, 2024).age, None);
        assert_eq!(Person::from_row("1", &future, 2024).age, Some(0));
        assert_eq!(Person::from_row("1", &wrapped, 2024).age, None);
        assert_eq!(
            Person::from_row("1", &ancient, 2024).lifespan.as_deref(),
            Some("-2147483648")
        );
    }

    #[test]
    fn test_sex_mapping() {
        assert_eq!(Sex::from_is_male(Some(true)), Sex::Male);
        assert_eq!(Sex::from_is_male(Some(false)), Sex::Female);
        assert_eq!(Sex::from_is_male(None), Sex::Unknown);
        assert!(!Sex::Unknown.is_known());
    }

    #[test]
    fn test_is_empty() {
        assert!(Person::from_row("1", &row(), 2024).is_empty());
        let r = PersonRow {
            is_male: Some(false),
            ..row()
        };
        assert!(!Person::from_row("1", &r, 2024).is_empty());
    }
}
