//! Error types for the Margin screener.
//!
//! [`ScreenerError`] covers every condition that aborts a screening run.
//! Per-ticker fetch failures are not errors at this level; they travel on
//! the separate [`FetchError`](crate::FetchError) channel and are absorbed by
//! the processor.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while screening a market.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// The market display name or code is not in the registry.
    #[error("Market not found: {0}")]
    MarketNotFound(String),

    /// No ticker list exists for the resolved market code.
    #[error("Ticker list not found: {}", .0.display())]
    TickerListNotFound(PathBuf),

    /// A required column is missing from an input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A user-supplied threshold cannot be used.
    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(String),

    /// A stored table holds values that cannot be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The run was cancelled before it completed.
    #[error("Screening cancelled")]
    Cancelled,

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error reading or writing a CSV file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error parsing a JSON registry file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl ScreenerError {
    /// Returns `true` if the run stopped because it was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<String> for ScreenerError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ScreenerError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for screener operations.
pub type Result<T> = std::result::Result<T, ScreenerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScreenerError::MarketNotFound("Tokyo".to_string());
        assert_eq!(err.to_string(), "Market not found: Tokyo");

        let err = ScreenerError::MissingColumn("Ticker".to_string());
        assert_eq!(err.to_string(), "Missing required column: Ticker");

        let err = ScreenerError::TickerListNotFound(PathBuf::from("data/raw/LON.csv"));
        assert_eq!(err.to_string(), "Ticker list not found: data/raw/LON.csv");
    }

    #[test]
    fn test_error_from_string() {
        let err: ScreenerError = "boom".into();
        assert!(matches!(err, ScreenerError::Other(ref m) if m == "boom"));
    }

    #[test]
    fn test_is_cancelled() {
        assert!(ScreenerError::Cancelled.is_cancelled());
        assert!(!ScreenerError::Other("x".to_string()).is_cancelled());
    }
}
