#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the Margin value screener.
//!
//! This crate holds everything the screening stages share: the fundamentals
//! record and its tabular form, user filter criteria, the error taxonomy,
//! the provider trait a data source implements, and the progress events a
//! screening run emits.

/// The version of the margin-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod criteria;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod filter;
pub mod types;

pub use criteria::{Criterion, CriterionBounds, FilterCriteria};
pub use error::{Result, ScreenerError};
pub use events::{
    ChannelSink, EventSink, NullSink, ScreeningEvent, TickerProgress, TimestampedEvent,
    TracingSink,
};
pub use fetcher::{FetchError, FundamentalsFetcher};
pub use filter::TableFilter;
pub use types::{
    FundamentalsRecord, FundamentalsTable, TIMESTAMP_FORMAT, TickerRecord, columns, fetch_timestamp,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
