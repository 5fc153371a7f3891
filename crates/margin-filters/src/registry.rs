//! Persisted default thresholds.
//!
//! The criteria registry is a JSON file holding the eight [`FilterCriteria`]
//! fields in user units. When the file does not exist the Graham literals
//! are used.

use margin_traits::{FilterCriteria, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// File name of the criteria registry inside the config directory.
pub const CRITERIA_FILE: &str = "graham_criteria.json";

/// Loads and saves the default threshold set.
#[derive(Debug, Clone)]
pub struct CriteriaRegistry {
    path: PathBuf,
}

impl CriteriaRegistry {
    /// Registry backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Registry backed by [`CRITERIA_FILE`] inside `config_dir`.
    #[must_use]
    pub fn in_dir(config_dir: impl AsRef<Path>) -> Self {
        Self::new(config_dir.as_ref().join(CRITERIA_FILE))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored defaults, or the Graham literals if none are stored.
    ///
    /// Fields missing from the file fall back to their Graham value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// holds a non-finite threshold.
    pub fn load(&self) -> Result<FilterCriteria> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no criteria registry, using Graham defaults");
                return Ok(FilterCriteria::graham());
            }
            Err(e) => return Err(e.into()),
        };

        let stored: FilterCriteria = serde_json::from_str(&text)?;
        stored.validate()?;
        Ok(FilterCriteria::graham().merge(&stored))
    }

    /// Write `criteria` to the backing file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is not finite or the file cannot be
    /// written.
    pub fn save(&self, criteria: &FilterCriteria) -> Result<()> {
        criteria.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(criteria)?)?;
        info!(path = %self.path.display(), "saved criteria registry");
        Ok(())
    }
}
