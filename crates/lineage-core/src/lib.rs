//! Lineage Core - Person records and raw family rows
//!
//! This crate holds the value types everything else is built on:
//!
//! - [`Person`]: an immutable demographic record with derived fields
//! - [`PersonRow`], [`UnionRow`], [`FiliationRow`]: the flat rows a data
//!   source hands us, grouped into a [`Snapshot`]
//! - [`LineageConfig`]: the knobs for membership and traversal caps
//!
//! # Example
//!
//! ```
//! use lineage_core::{Person, PersonRow, Sex};
//!
//! let row = PersonRow {
//!     id: Some("1".into()),
//!     is_male: Some(true),
//!     firstname: Some("ahmed".into()),
//!     lastname: Some("Zlitni".into()),
//!     birth_year: Some(1950),
//!     ..Default::default()
//! };
//! let person = Person::from_row("1", &row, 2024);
//!
//! assert_eq!(person.sex, Sex::Male);
//! assert_eq!(person.fullname.as_deref(), Some("Ahmed Zlitni"));
//! assert_eq!(person.lifespan.as_deref(), Some("1950"));
//! ```

pub mod config;
pub mod error;
pub mod person;
pub mod rows;

pub use config::{LineageConfig, ParentConflict};
pub use error::{LineageError, Result};
pub use person::{Person, Sex};
pub use rows::{FiliationRow, PersonRow, Snapshot, UnionRow};
