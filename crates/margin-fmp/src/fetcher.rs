//! [`FundamentalsFetcher`] backed by the FMP client.

use crate::{FmpClient, FmpError, Snapshot};
use async_trait::async_trait;
use margin_traits::{FetchError, FundamentalsFetcher, FundamentalsRecord, fetch_timestamp};

/// Fetches fundamentals snapshots from Financial Modeling Prep.
#[derive(Debug, Clone)]
pub struct FmpFetcher {
    client: FmpClient,
}

impl FmpFetcher {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: FmpClient) -> Self {
        Self { client }
    }

    /// Build a fetcher from `FMP_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    pub fn from_env() -> crate::Result<Self> {
        FmpClient::from_env().map(Self::new)
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &FmpClient {
        &self.client
    }
}

/// Assemble a record from a snapshot, or report the ticker unsupported.
pub(crate) fn to_record(ticker: &str, snapshot: &Snapshot) -> Result<FundamentalsRecord, FetchError> {
    let record = FundamentalsRecord {
        ticker: ticker.to_string(),
        name: snapshot.name(),
        price: snapshot.price(),
        pe: snapshot.pe(),
        pb: snapshot.pb(),
        eps: snapshot.eps(),
        dividend_yield: snapshot.dividend_yield(),
        debt_to_equity: snapshot.debt_to_equity(),
        current_ratio: snapshot.current_ratio(),
        market_cap: snapshot.market_cap(),
        last_updated: fetch_timestamp(),
    };

    if record.has_metrics() {
        Ok(record)
    } else {
        Err(FetchError::unsupported(ticker))
    }
}

/// Map a client failure onto the per-ticker taxonomy.
pub(crate) fn classify(ticker: &str, error: &FmpError) -> FetchError {
    if error.is_not_found() {
        FetchError::unsupported(ticker)
    } else {
        FetchError::transient(ticker, error.to_string())
    }
}

#[async_trait]
impl FundamentalsFetcher for FmpFetcher {
    fn name(&self) -> &str {
        "fmp"
    }

    async fn fetch(&self, ticker: &str) -> Result<FundamentalsRecord, FetchError> {
        let snapshot = self
            .client
            .snapshot(ticker)
            .await
            .map_err(|e| classify(ticker, &e))?;
        to_record(ticker, &snapshot)
    }
}
