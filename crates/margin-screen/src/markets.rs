//! Market registry: display names, internal codes and ticker suffixes.

use margin_traits::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::Path};
use tracing::debug;

/// Registry entry for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Internal market code, used in file names.
    pub code: String,
    /// Page the ticker list was scraped from.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Suffix appended to exchange symbols, e.g. `.L`.
    #[serde(default)]
    pub suffix: Option<String>,
}

impl MarketInfo {
    fn new(code: &str, suffix: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            source_url: None,
            suffix: suffix.map(str::to_string),
        }
    }
}

/// A market resolved from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    /// Human-readable name.
    pub name: String,
    /// Registry entry.
    pub info: MarketInfo,
}

impl Market {
    /// Internal market code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.info.code
    }
}

/// Mapping from display name to [`MarketInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRegistry {
    markets: Vec<Market>,
}

impl Default for MarketRegistry {
    fn default() -> Self {
        let defaults = [
            ("NYSE", "NYSE", None),
            ("NASDAQ", "NASDAQ", None),
            ("US OTC", "US_OTC", None),
            ("London Stock Exchange", "LON", Some(".L")),
            ("Toronto Stock Exchange", "TSX", Some(".TO")),
            ("Australian Securities Exchange", "ASX", Some(".AX")),
        ];
        Self {
            markets: defaults
                .into_iter()
                .map(|(name, code, suffix)| Market {
                    name: name.to_string(),
                    info: MarketInfo::new(code, suffix),
                })
                .collect(),
        }
    }
}

impl MarketRegistry {
    /// Parse a registry from JSON keyed by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the registry shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, MarketInfo> = serde_json::from_str(json)?;
        Ok(Self {
            markets: entries
                .into_iter()
                .map(|(name, info)| Market { name, info })
                .collect(),
        })
    }

    /// Load the registry file, or the six default markets if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no market registry, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Serialize the registry to JSON keyed by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let entries: BTreeMap<&str, &MarketInfo> = self
            .markets
            .iter()
            .map(|m| (m.name.as_str(), &m.info))
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// Look up a market by display name, or failing that by code
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::MarketNotFound`] if neither matches.
    pub fn resolve(&self, name_or_code: &str) -> Result<Market> {
        let needle = name_or_code.trim();
        self.markets
            .iter()
            .find(|m| m.name == needle)
            .or_else(|| {
                self.markets
                    .iter()
                    .find(|m| m.info.code.eq_ignore_ascii_case(needle))
            })
            .cloned()
            .ok_or_else(|| ScreenerError::MarketNotFound(name_or_code.to_string()))
    }

    /// Markets in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.iter()
    }

    /// Number of markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
