//! Screener configuration and on-disk layout.

use margin_traits::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where the screener reads and writes its files, and how many fetches
/// may run at once.
///
/// Layout below `data_dir`:
///
/// ```text
/// raw/{code}.csv                ticker lists
/// processed/{code}_tickers.csv  fetched fundamentals
/// configs/markets.json          market registry
/// configs/graham_criteria.json  default thresholds
/// ```
///
/// Baseline output goes to `{results_dir}/filtered_{code}.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Root of the data directory.
    pub data_dir: PathBuf,
    /// Directory for filtered results.
    pub results_dir: PathBuf,
    /// Maximum number of fetches in flight. 1 means sequential.
    pub concurrency: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            concurrency: 1,
        }
    }
}

impl ScreenerConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the results directory.
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set the fetch concurrency. Zero is treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Concurrency actually used, at least one.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Directory of registry files.
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.data_dir.join("configs")
    }

    /// Ticker list for a market code.
    #[must_use]
    pub fn ticker_list_path(&self, code: &str) -> PathBuf {
        self.data_dir.join("raw").join(format!("{code}.csv"))
    }

    /// Processed fundamentals for a market code.
    #[must_use]
    pub fn processed_path(&self, code: &str) -> PathBuf {
        self.data_dir
            .join("processed")
            .join(format!("{code}_tickers.csv"))
    }

    /// Baseline output for a market code.
    #[must_use]
    pub fn filtered_path(&self, code: &str) -> PathBuf {
        self.results_dir.join(format!("filtered_{code}.csv"))
    }

    /// Market registry file.
    #[must_use]
    pub fn markets_path(&self) -> PathBuf {
        self.config_dir().join("markets.json")
    }

    /// Criteria registry file.
    #[must_use]
    pub fn criteria_path(&self) -> PathBuf {
        self.config_dir().join(margin_filters::registry::CRITERIA_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = ScreenerConfig::default();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.ticker_list_path("LON"), Path::new("data/raw/LON.csv"));
        assert_eq!(
            config.processed_path("LON"),
            Path::new("data/processed/LON_tickers.csv")
        );
        assert_eq!(config.filtered_path("LON"), Path::new("results/filtered_LON.csv"));
        assert_eq!(config.markets_path(), Path::new("data/configs/markets.json"));
        assert_eq!(
            config.criteria_path(),
            Path::new("data/configs/graham_criteria.json")
        );
    }

    #[test]
    fn test_zero_concurrency_is_sequential() {
        let config = ScreenerConfig::default().with_concurrency(0);
        assert_eq!(config.effective_concurrency(), 1);
        let config = ScreenerConfig {
            concurrency: 0,
            ..ScreenerConfig::default()
        };
        assert_eq!(config.effective_concurrency(), 1);
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screener.json");
        fs::write(&path, r#"{"concurrency": 4}"#).unwrap();

        let config = ScreenerConfig::from_file(&path).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
