//! Screening pipeline for the Margin value screener.
//!
//! This crate wires the pieces of a screening run together:
//! - [`MarketDataProcessor`]: fetches fundamentals for a ticker list,
//!   skipping tickers that fail, and persists the table
//! - [`Screener`]: the staged run from market name to final table
//! - [`TableStore`] and [`MarketRegistry`]: flat-file inputs and outputs
//! - [`format_for_display`] and [`ResultSummary`]: presentation helpers
//!
//! # Example
//!
//! ```ignore
//! use margin_fmp::FmpFetcher;
//! use margin_screen::{Screener, ScreenerConfig};
//! use margin_traits::FilterCriteria;
//!
//! let mut screener = Screener::new(FmpFetcher::from_env()?, ScreenerConfig::default());
//! let result = screener.run("London Stock Exchange", &FilterCriteria::new()).await?;
//! println!("{} matches", result.table.len());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod config;
mod format;
mod markets;
mod orchestrator;
mod processor;
pub mod store;

#[cfg(test)]
mod mock;

pub use cancel::CancelToken;
pub use config::ScreenerConfig;
pub use format::{DISPLAY_LABELS, ResultSummary, format_for_display};
pub use markets::{Market, MarketInfo, MarketRegistry};
pub use orchestrator::{FetchStats, Screener, ScreeningResult, ScreeningStage};
pub use processor::{
    MarketDataProcessor, OfflineFetcher, ProcessReport, ProcessUpdate, success_rate,
};
pub use store::{TableStore, default_export_name};
