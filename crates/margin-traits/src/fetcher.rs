//! Provider trait for per-ticker fundamentals.

use crate::FundamentalsRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Why a single ticker produced no record.
///
/// Both variants are expected during a run and never abort it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider has no data for the symbol.
    #[error("{ticker}: ticker is not supported by the data provider")]
    Unsupported {
        /// Symbol that was requested.
        ticker: String,
    },

    /// Transport or protocol failure other than "not found".
    #[error("{ticker}: {message}")]
    Transient {
        /// Symbol that was requested.
        ticker: String,
        /// Status or error detail.
        message: String,
    },
}

impl FetchError {
    /// Create an [`FetchError::Unsupported`].
    pub fn unsupported(ticker: impl Into<String>) -> Self {
        Self::Unsupported {
            ticker: ticker.into(),
        }
    }

    /// Create a [`FetchError::Transient`].
    pub fn transient(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            ticker: ticker.into(),
            message: message.into(),
        }
    }

    /// Symbol the failure belongs to.
    #[must_use]
    pub fn ticker(&self) -> &str {
        match self {
            Self::Unsupported { ticker } | Self::Transient { ticker, .. } => ticker,
        }
    }

    /// Whether the provider simply has no data for the symbol.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// A source of fundamentals snapshots.
///
/// Implementations query one ticker at a time and classify the outcome:
/// a record with at least one tracked metric, [`FetchError::Unsupported`]
/// when the provider knows nothing about the symbol, or
/// [`FetchError::Transient`] for everything else. Retries are not the
/// fetcher's concern.
#[async_trait]
pub trait FundamentalsFetcher: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Fetch the latest snapshot for `ticker`.
    async fn fetch(&self, ticker: &str) -> Result<FundamentalsRecord, FetchError>;
}

#[async_trait]
impl<T: FundamentalsFetcher + ?Sized> FundamentalsFetcher for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self, ticker: &str) -> Result<FundamentalsRecord, FetchError> {
        (**self).fetch(ticker).await
    }
}
