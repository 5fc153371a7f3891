#![doc(issue_tracker_base_url = "https://github.com/factordynamics/margin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # margin
//!
//! Benjamin Graham value screener for listed equities.
//!
//! margin is an umbrella crate that re-exports all margin sub-crates for
//! convenience. It screens a market's ticker list against Graham's classic
//! value criteria, optionally refined with user thresholds.
//!
//! ## Quick Start
//!
//! ```ignore
//! use margin::fmp::FmpFetcher;
//! use margin::screen::{Screener, ScreenerConfig, format_for_display};
//! use margin::{Criterion, FilterCriteria, Result};
//!
//! # async fn example() -> Result<()> {
//! let fetcher = FmpFetcher::from_env().map_err(|e| e.to_string())?;
//! let mut screener = Screener::new(fetcher, ScreenerConfig::default());
//!
//! // Graham baseline, then P/E of at most 10
//! let criteria = FilterCriteria::new().with(Criterion::PeMax, Some(10.0));
//! let result = screener.run("London Stock Exchange", &criteria).await?;
//!
//! let shown = format_for_display(&result.table)?;
//! println!("{} matches", shown.height());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Records, tables, errors, the fetcher trait and events
//! - [`filters`] - Graham baseline and custom threshold filters
//! - [`screen`] - Ticker processing, orchestration, storage and formatting
//! - [`fmp`] - Financial Modeling Prep fundamentals provider
//!
//! ## Pipeline
//!
//! 1. **Ticker list** is read from `data/raw/{code}.csv`
//! 2. **Processor** fetches fundamentals per ticker, skipping failures
//! 3. **Baseline** keeps rows passing all eight Graham inequalities
//! 4. **Custom filter** applies any user thresholds on top
//! 5. **Formatter** rounds and relabels the result for display

/// Version information for the margin crate.
///
/// This constant contains the current version of margin as specified in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core types and traits for margin.
///
/// - [`FundamentalsFetcher`] - Per-ticker fundamentals provider
/// - [`TableFilter`] - Row filter over a fundamentals table
/// - [`EventSink`] - Receiver of screening progress events
pub mod traits {
    pub use margin_traits::*;
}

// Re-export core traits at top level for convenience
pub use margin_traits::{EventSink, FundamentalsFetcher, TableFilter};

// Re-export error types
pub use margin_traits::{FetchError, Result, ScreenerError};

// Re-export common types
pub use margin_traits::{
    Criterion, FilterCriteria, FundamentalsRecord, FundamentalsTable, ScreeningEvent, TickerRecord,
};

// ============================================================================
// Filters
// ============================================================================

/// Value-investing filters.
///
/// ## Graham Baseline
///
/// | metric | condition |
/// |---|---|
/// | P/E | < 15 |
/// | P/B | < 1.5 |
/// | P/E × P/B | < 22.5 |
/// | debt/equity | < 0.5 |
/// | current ratio | > 1.5 |
/// | dividend yield | > 2% |
/// | EPS | > 0 |
/// | market cap | > 500M |
///
/// ## Custom Thresholds
///
/// Any subset of the eight [`Criterion`]s, each an inclusive bound.
/// Dividend yield is given in percent and market cap in millions.
///
/// # Example
///
/// ```ignore
/// use margin::filters::{apply_baseline, apply_custom};
/// use margin::{Criterion, FilterCriteria};
///
/// let baseline = apply_baseline(&table)?;
/// let criteria = FilterCriteria::new().with(Criterion::DividendYieldMin, Some(3.0));
/// let refined = apply_custom(&baseline, criteria)?;
/// ```
pub mod filters {
    pub use margin_filters::*;
}

// ============================================================================
// Screening Pipeline
// ============================================================================

/// Ticker processing, orchestration, storage and formatting.
pub mod screen {
    pub use margin_screen::*;
}

pub use margin_screen::{Screener, ScreenerConfig, ScreeningResult};

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) fundamentals provider.
///
/// ## Setup
///
/// 1. Get a free API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add to `.env` file
pub mod fmp {
    pub use margin_fmp::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use margin::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Criterion, EventSink, FetchError, FilterCriteria, FundamentalsFetcher,
        FundamentalsRecord, FundamentalsTable, Result, Screener, ScreenerConfig, ScreenerError,
        TableFilter,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_re_exports() {
        fn _accept_fetcher(_fetcher: &dyn FundamentalsFetcher) {}
        fn _accept_filter(_filter: &dyn TableFilter) {}
        fn _accept_sink(_sink: &dyn EventSink) {}

        let _baseline: &dyn TableFilter = &filters::GrahamBaseline;
    }

    #[test]
    fn test_error_types() {
        let _result: Result<()> = Ok(());
        let _error: ScreenerError = ScreenerError::MarketNotFound("test".to_string());
        assert!(FetchError::unsupported("X").is_unsupported());
    }

    #[test]
    fn test_offline_screen_through_umbrella() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScreenerConfig::default()
            .with_data_dir(dir.path().join("data"))
            .with_results_dir(dir.path().join("results"));

        let cheap = FundamentalsRecord {
            pe: Some(9.0),
            pb: Some(0.9),
            eps: Some(1.1),
            dividend_yield: Some(0.04),
            debt_to_equity: Some(0.2),
            current_ratio: Some(2.2),
            market_cap: Some(3.0e9),
            ..FundamentalsRecord::new("CHEAP.AX", "Cheap Ltd")
        };
        let dear = FundamentalsRecord {
            pe: Some(30.0),
            ..cheap.clone()
        };
        let dear = FundamentalsRecord {
            ticker: "DEAR.AX".to_string(),
            ..dear
        };
        let table = FundamentalsTable::from_records(&[cheap, dear]).unwrap();
        screen::TableStore::new(config.clone())
            .save_processed("ASX", &table)
            .unwrap();

        let fetcher = fmp::FmpFetcher::new(fmp::FmpClient::new("unused"));
        let mut screener = Screener::new(fetcher, config);
        let result = screener
            .run_offline("Australian Securities Exchange", &FilterCriteria::new())
            .unwrap();

        assert_eq!(result.table.tickers().unwrap(), vec!["CHEAP.AX"]);
        assert_eq!(screener.stage(), screen::ScreeningStage::Done);
    }
}
