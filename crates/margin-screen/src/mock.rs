//! In-memory fetcher for tests.

use crate::CancelToken;
use async_trait::async_trait;
use margin_traits::{FetchError, FundamentalsFetcher, FundamentalsRecord};
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

/// Serves canned responses. Unknown tickers are unsupported.
#[derive(Debug, Default)]
pub(crate) struct MockFetcher {
    responses: HashMap<String, Result<FundamentalsRecord, FetchError>>,
    delays: HashMap<String, Duration>,
    cancel_after: Option<(usize, CancelToken)>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_record(mut self, record: FundamentalsRecord) -> Self {
        self.responses.insert(record.ticker.clone(), Ok(record));
        self
    }

    pub(crate) fn with_error(mut self, error: FetchError) -> Self {
        self.responses.insert(error.ticker().to_string(), Err(error));
        self
    }

    pub(crate) fn with_delay(mut self, ticker: &str, millis: u64) -> Self {
        self.delays
            .insert(ticker.to_string(), Duration::from_millis(millis));
        self
    }

    /// Cancel `token` while serving the `n`th request.
    pub(crate) fn cancel_after(mut self, n: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FundamentalsFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, ticker: &str) -> Result<FundamentalsRecord, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requested.lock().unwrap().push(ticker.to_string());
        if let Some((n, token)) = &self.cancel_after {
            if call == *n {
                token.cancel();
            }
        }
        if let Some(delay) = self.delays.get(ticker) {
            tokio::time::sleep(*delay).await;
        }
        self.responses
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::unsupported(ticker)))
    }
}

/// A record that passes the Graham baseline.
pub(crate) fn value_stock(ticker: &str) -> FundamentalsRecord {
    FundamentalsRecord {
        price: Some(30.0),
        pe: Some(12.0),
        pb: Some(1.2),
        eps: Some(2.5),
        dividend_yield: Some(0.03),
        debt_to_equity: Some(0.3),
        current_ratio: Some(2.0),
        market_cap: Some(1_000_000_000.0),
        ..FundamentalsRecord::new(ticker, format!("{ticker} Holdings"))
    }
}

/// A record that fails the Graham baseline on P/E.
pub(crate) fn growth_stock(ticker: &str) -> FundamentalsRecord {
    FundamentalsRecord {
        pe: Some(45.0),
        ..value_stock(ticker)
    }
}
