//! Engine configuration.
//!
//! Everything that used to be a literal in the traversal code lives here:
//! the root family name that seeds membership, the depth at which kinship
//! naming gives up, and the step caps that keep walks over malformed data
//! finite. Stored on disk as JSON next to the data (`.lineage/config.json`).

use crate::error::{LineageError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default root family name for the tracked bloodline.
pub const DEFAULT_LASTNAME_SENTINEL: &str = "الزليطني";

/// How to settle a child that gets two fathers (or two mothers) from its unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentConflict {
    /// Keep the first parent observed, ignore later ones.
    #[default]
    FirstWins,
    /// Overwrite with each new parent observed.
    LastWins,
}

/// Tunables for graph construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    /// Last name that makes a parentless male a member.
    pub lastname_sentinel: String,
    /// Generations to the common ancestor past which a relation is `distant`.
    pub max_kinship_depth: usize,
    /// Hop cap for the member-parent ancestor walk.
    pub ancestor_depth_limit: usize,
    /// Step cap per side when building kinship chains.
    pub kinship_step_cap: usize,
    /// Tie-break for competing father/mother assignments.
    pub parent_conflict: ParentConflict,
    /// Year used to compute the age of living persons. `None` means this year.
    pub reference_year: Option<i32>,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            lastname_sentinel: DEFAULT_LASTNAME_SENTINEL.to_string(),
            max_kinship_depth: 4,
            ancestor_depth_limit: 1000,
            kinship_step_cap: 4096,
            parent_conflict: ParentConflict::FirstWins,
            reference_year: None,
        }
    }
}

impl LineageConfig {
    /// Loads and validates a JSON config file.
    ///
    /// Fields missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: LineageConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Rejects settings that would make every query degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.lastname_sentinel.trim().is_empty() {
            return Err(LineageError::InvalidConfig(
                "lastname_sentinel must not be empty".into(),
            ));
        }
        if self.ancestor_depth_limit == 0 {
            return Err(LineageError::InvalidConfig(
                "ancestor_depth_limit must be at least 1".into(),
            ));
        }
        if self.kinship_step_cap == 0 {
            return Err(LineageError::InvalidConfig(
                "kinship_step_cap must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Sets the sentinel last name.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.lastname_sentinel = sentinel.into();
        self
    }

    /// Pins the reference year used for ages.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// The year ages are computed against.
    pub fn effective_year(&self) -> i32 {
        use chrono::Datelike;
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LineageConfig::default();
        assert_eq!(config.lastname_sentinel, DEFAULT_LASTNAME_SENTINEL);
        assert_eq!(config.max_kinship_depth, 4);
        assert_eq!(config.ancestor_depth_limit, 1000);
        assert_eq!(config.kinship_step_cap, 4096);
        assert_eq!(config.parent_conflict, ParentConflict::FirstWins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "lastname_sentinel": "Zlitni", "parent_conflict": "last_wins" }"#,
        )
        .unwrap();

        let config = LineageConfig::load(&path).unwrap();
        assert_eq!(config.lastname_sentinel, "Zlitni");
        assert_eq!(config.parent_conflict, ParentConflict::LastWins);
        assert_eq!(config.max_kinship_depth, 4);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".lineage").join("config.json");
        let config = LineageConfig::default().with_reference_year(2000);

        config.save(&path).unwrap();
        let loaded = LineageConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_rejects_empty_sentinel() {
        let config = LineageConfig::default().with_sentinel("  ");
        assert!(matches!(
            config.validate(),
            Err(LineageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_caps() {
        let config = LineageConfig {
            kinship_step_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = LineageConfig::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(LineageError::Io(_))));
    }

    #[test]
    fn test_effective_year_uses_reference() {
        let config = LineageConfig::default().with_reference_year(1999);
        assert_eq!(config.effective_year(), 1999);
    }
}
