//! Financial Modeling Prep (FMP) fundamentals provider for Margin.
//!
//! This crate provides a client for the [Financial Modeling
//! Prep](https://financialmodelingprep.com/) API and an implementation of
//! [`FundamentalsFetcher`](margin_traits::FundamentalsFetcher) on top of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use margin_fmp::FmpFetcher;
//! use margin_traits::FundamentalsFetcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = FmpFetcher::from_env()?;
//!     let record = fetcher.fetch("BARC.L").await?;
//!     println!("{} P/E {:?}", record.ticker, record.pe);
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod fetcher;
mod types;

pub use client::FmpClient;
pub use error::FmpError;
pub use fetcher::FmpFetcher;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
