//! Fetches fundamentals for a ticker list and persists the result.

use crate::{CancelToken, TableStore};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use margin_traits::{
    FetchError, FundamentalsFetcher, FundamentalsRecord, FundamentalsTable, Result,
    ScreenerError, TickerProgress, TickerRecord,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Share of `total` that `succeeded`, in percent. An empty list is 0%.
#[must_use]
pub fn success_rate(succeeded: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        succeeded as f64 / total as f64 * 100.0
    }
}

/// Fetcher for runs that must not touch the network.
///
/// Every ticker is reported unsupported. Used for offline re-screens, which
/// never reach the fetch stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl FundamentalsFetcher for OfflineFetcher {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch(&self, ticker: &str) -> std::result::Result<FundamentalsRecord, FetchError> {
        Err(FetchError::unsupported(ticker))
    }
}

/// Per-ticker notification from [`MarketDataProcessor`].
///
/// Updates arrive in ticker-list order, one per ticker, as soon as that
/// ticker is done.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessUpdate {
    /// A record was added to the table.
    Fetched(TickerProgress),
    /// The ticker produced no record.
    Skipped {
        /// 1-based position in the ticker list.
        current: usize,
        /// Length of the ticker list.
        total: usize,
        /// Why it was skipped.
        error: FetchError,
    },
    /// The ticker repeats an earlier list entry; the first record is kept.
    Duplicate {
        /// Repeated symbol.
        ticker: String,
        /// 1-based position in the ticker list.
        current: usize,
        /// Length of the ticker list.
        total: usize,
    },
}

impl ProcessUpdate {
    /// 1-based position of the ticker this update is about.
    #[must_use]
    pub const fn current(&self) -> usize {
        match self {
            Self::Fetched(progress) => progress.current,
            Self::Skipped { current, .. } | Self::Duplicate { current, .. } => *current,
        }
    }
}

/// Outcome of processing one ticker list.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    /// One row per successfully fetched ticker, in list order.
    pub table: FundamentalsTable,
    /// Tickers in the list.
    pub total: usize,
    /// Tickers that produced no record.
    pub skipped: Vec<FetchError>,
    /// Repeated tickers whose record was dropped.
    pub duplicates: usize,
}

impl ProcessReport {
    /// Rows in the table.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.table.len()
    }

    /// `succeeded / total * 100`, or 0 for an empty list.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        success_rate(self.succeeded(), self.total)
    }
}

/// Turns a ticker list into a fundamentals table.
///
/// Fetch failures are absorbed: the ticker is logged, reported as
/// [`ProcessUpdate::Skipped`] and left out of the table. With a
/// concurrency above one, up to that many fetches run at once but results
/// are still consumed in list order.
#[derive(Debug)]
pub struct MarketDataProcessor<F> {
    fetcher: F,
    store: TableStore,
    concurrency: usize,
    cancel: CancelToken,
}

impl<F: FundamentalsFetcher> MarketDataProcessor<F> {
    /// Create a processor writing to `store`, with the store's configured
    /// concurrency.
    pub fn new(fetcher: F, store: TableStore) -> Self {
        let concurrency = store.config().effective_concurrency();
        Self {
            fetcher,
            store,
            concurrency,
            cancel: CancelToken::new(),
        }
    }

    /// Override the number of fetches in flight.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Share an existing cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the run before its next fetch.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// The underlying fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch every ticker, persist the table under `code` and report.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Cancelled`] if the run was cancelled, in
    /// which case nothing is written, or an error if the table cannot be
    /// built or saved.
    pub async fn process<P>(
        &self,
        code: &str,
        tickers: &[TickerRecord],
        on_update: P,
    ) -> Result<ProcessReport>
    where
        P: FnMut(ProcessUpdate),
    {
        let report = self.fetch_all(tickers, on_update).await?;
        let path = self.store.save_processed(code, &report.table)?;
        info!(
            market = code,
            succeeded = report.succeeded(),
            total = report.total,
            "Successfully processed {}/{} tickers ({:.2}% for {code})",
            report.succeeded(),
            report.total,
            report.success_rate(),
        );
        debug!(path = %path.display(), "saved processed table");
        Ok(report)
    }

    /// Fetch every ticker without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Cancelled`] if the run was cancelled, or an
    /// error if the table cannot be built.
    pub async fn fetch_all<P>(&self, tickers: &[TickerRecord], mut on_update: P) -> Result<ProcessReport>
    where
        P: FnMut(ProcessUpdate),
    {
        let total = tickers.len();
        let fetcher = &self.fetcher;
        let cancel = &self.cancel;
        debug!(provider = fetcher.name(), total, concurrency = self.concurrency, "fetching");

        let mut outcomes = stream::iter(tickers.iter().enumerate())
            .map(|(index, entry)| async move {
                if cancel.is_cancelled() {
                    return None;
                }
                let result = fetcher.fetch(&entry.ticker).await;
                Some((index, entry, result))
            })
            .buffered(self.concurrency);

        let mut records: Vec<FundamentalsRecord> = Vec::with_capacity(total);
        let mut seen = HashSet::new();
        let mut skipped = Vec::new();
        let mut duplicates = 0;
        let mut cancelled = false;

        while let Some(outcome) = outcomes.next().await {
            let Some((index, entry, result)) = outcome else {
                cancelled = true;
                continue;
            };
            if cancelled {
                continue;
            }
            let current = index + 1;

            match result.and_then(|record| accept(entry, record)) {
                Ok(record) => {
                    if !seen.insert(record.ticker.clone()) {
                        duplicates += 1;
                        debug!(ticker = %record.ticker, "duplicate ticker, keeping first record");
                        on_update(ProcessUpdate::Duplicate {
                            ticker: record.ticker,
                            current,
                            total,
                        });
                        continue;
                    }
                    let progress = TickerProgress {
                        ticker: record.ticker.clone(),
                        company: Some(record.name.clone()).filter(|name| !name.is_empty()),
                        current,
                        total,
                    };
                    records.push(record);
                    on_update(ProcessUpdate::Fetched(progress));
                }
                Err(error) => {
                    warn!(ticker = %entry.ticker, current, total, "{error}");
                    on_update(ProcessUpdate::Skipped {
                        current,
                        total,
                        error: error.clone(),
                    });
                    skipped.push(error);
                }
            }
        }

        if cancelled {
            warn!(fetched = records.len(), total, "processing cancelled");
            return Err(ScreenerError::Cancelled);
        }

        Ok(ProcessReport {
            table: FundamentalsTable::from_records(&records)?,
            total,
            skipped,
            duplicates,
        })
    }
}

/// Key the record by its list symbol, fill a blank name from the list and
/// reject records without any tracked metric.
fn accept(
    entry: &TickerRecord,
    mut record: FundamentalsRecord,
) -> std::result::Result<FundamentalsRecord, FetchError> {
    if !record.has_metrics() {
        return Err(FetchError::unsupported(entry.ticker.as_str()));
    }
    record.ticker.clone_from(&entry.ticker);
    if record.name.is_empty() {
        record.name.clone_from(&entry.company);
    }
    Ok(record)
}
