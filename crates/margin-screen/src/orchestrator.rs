//! End-to-end screening runs.
//!
//! A run moves through [`ScreeningStage`]s:
//!
//! ```text
//! Idle -> LoadingTickers -> FetchingFundamentals -> ApplyingBaseline
//!      -> [ApplyingCustom] -> Done
//! ```
//!
//! Any fatal error moves the run to `Failed`, is reported once on the
//! event sink and returned to the caller. Per-ticker fetch failures are not
//! fatal; they are absorbed by the [`MarketDataProcessor`].

use crate::{
    CancelToken, Market, MarketDataProcessor, MarketRegistry, ProcessUpdate, ScreenerConfig,
    TableStore, success_rate,
};
use margin_filters::{apply_baseline, apply_custom};
use margin_traits::{
    EventSink, FilterCriteria, FundamentalsFetcher, FundamentalsTable, Result, ScreeningEvent,
    TimestampedEvent, TracingSink,
};
use std::{fmt, path::PathBuf, sync::Arc};
use tracing::{error, info};

/// Where a screening run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreeningStage {
    /// No run started yet.
    #[default]
    Idle,
    /// Resolving the market and reading its ticker list.
    LoadingTickers,
    /// Fetching fundamentals per ticker.
    FetchingFundamentals,
    /// Applying the Graham baseline.
    ApplyingBaseline,
    /// Applying user thresholds.
    ApplyingCustom,
    /// The last run finished.
    Done,
    /// The last run failed.
    Failed,
}

impl ScreeningStage {
    /// Whether the stage ends a run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for ScreeningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::LoadingTickers => "loading tickers",
            Self::FetchingFundamentals => "fetching fundamentals",
            Self::ApplyingBaseline => "applying baseline",
            Self::ApplyingCustom => "applying custom filters",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counts from the fetch stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchStats {
    /// Tickers in the list.
    pub total: usize,
    /// Tickers that produced a record.
    pub succeeded: usize,
    /// Tickers that produced no record.
    pub skipped: usize,
}

impl FetchStats {
    /// `succeeded / total * 100`, or 0 for an empty list.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        success_rate(self.succeeded, self.total)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ScreeningResult {
    /// Market that was screened.
    pub market: Market,
    /// Fetch counts, absent for offline runs.
    pub fetch: Option<FetchStats>,
    /// Rows that passed the Graham baseline.
    pub baseline_matches: usize,
    /// Where the baseline output was written.
    pub filtered_path: PathBuf,
    /// Final rows, in processed-table order.
    pub table: FundamentalsTable,
}

/// Runs the screening pipeline for one market at a time.
pub struct Screener<F> {
    processor: MarketDataProcessor<F>,
    store: TableStore,
    markets: Option<MarketRegistry>,
    sink: Arc<dyn EventSink>,
    stage: ScreeningStage,
}

impl<F> fmt::Debug for Screener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screener")
            .field("store", &self.store)
            .field("markets", &self.markets)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl<F: FundamentalsFetcher> Screener<F> {
    /// Create a screener reporting to [`TracingSink`].
    pub fn new(fetcher: F, config: ScreenerConfig) -> Self {
        let store = TableStore::new(config);
        Self {
            processor: MarketDataProcessor::new(fetcher, store.clone()),
            store,
            markets: None,
            sink: Arc::new(TracingSink),
            stage: ScreeningStage::Idle,
        }
    }

    /// Report events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Use a fixed market registry instead of loading it per run.
    #[must_use]
    pub fn with_markets(mut self, markets: MarketRegistry) -> Self {
        self.markets = Some(markets);
        self
    }

    /// Share an existing cancellation token with the fetch stage.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.processor = self.processor.with_cancel_token(cancel);
        self
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> ScreeningStage {
        self.stage
    }

    /// Token that cancels the running fetch stage before its next ticker.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.processor.cancel_token().clone()
    }

    /// The file store.
    #[must_use]
    pub const fn store(&self) -> &TableStore {
        &self.store
    }

    /// Market registry in effect for the next run.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry file exists but cannot be read.
    pub fn markets(&self) -> Result<MarketRegistry> {
        match &self.markets {
            Some(markets) => Ok(markets.clone()),
            None => MarketRegistry::load(self.store.config().markets_path()),
        }
    }

    /// Fetch fundamentals for `market` and screen them.
    ///
    /// `market` is a display name or market code. The custom stage runs
    /// only when `criteria` has at least one threshold. A cancellation left
    /// over from an earlier run is cleared first.
    ///
    /// # Errors
    ///
    /// Returns the fatal error that stopped the run. No partial result is
    /// returned.
    pub async fn run(&mut self, market: &str, criteria: &FilterCriteria) -> Result<ScreeningResult> {
        self.processor.cancel_token().reset();
        let outcome = self.run_online(market, criteria).await;
        self.finish(outcome)
    }

    /// Screen the last processed table for `market` without fetching.
    ///
    /// # Errors
    ///
    /// Returns the fatal error that stopped the run, including a missing
    /// processed table.
    pub fn run_offline(&mut self, market: &str, criteria: &FilterCriteria) -> Result<ScreeningResult> {
        let outcome = self.rescreen(market, criteria);
        self.finish(outcome)
    }

    async fn run_online(&mut self, name: &str, criteria: &FilterCriteria) -> Result<ScreeningResult> {
        let market = self.start(name, criteria)?;
        let code = market.code().to_string();

        let tickers = self.store.load_tickers(&code)?;
        self.emit(ScreeningEvent::TickersLoaded {
            market: market.name.clone(),
            code: code.clone(),
            count: tickers.len(),
        });

        self.stage = ScreeningStage::FetchingFundamentals;
        let sink = Arc::clone(&self.sink);
        let report = self
            .processor
            .process(&code, &tickers, |update| {
                let event = match update {
                    ProcessUpdate::Fetched(progress) => ScreeningEvent::TickerProcessed(progress),
                    ProcessUpdate::Skipped { error, .. } => ScreeningEvent::TickerSkipped {
                        ticker: error.ticker().to_string(),
                        reason: error.to_string(),
                    },
                    ProcessUpdate::Duplicate { ticker, .. } => ScreeningEvent::TickerSkipped {
                        ticker,
                        reason: "duplicate ticker, first record kept".to_string(),
                    },
                };
                sink.emit(TimestampedEvent::now(event));
            })
            .await?;

        let stats = FetchStats {
            total: report.total,
            succeeded: report.succeeded(),
            skipped: report.skipped.len(),
        };
        self.emit(ScreeningEvent::FetchSummary {
            succeeded: stats.succeeded,
            total: stats.total,
            success_rate: stats.success_rate(),
        });

        let mut result = self.filter(market, report.table, criteria)?;
        result.fetch = Some(stats);
        Ok(result)
    }

    fn rescreen(&mut self, name: &str, criteria: &FilterCriteria) -> Result<ScreeningResult> {
        let market = self.start(name, criteria)?;
        let table = self.store.load_processed(market.code())?;
        info!(market = %market.name, rows = table.len(), "loaded processed table");
        self.filter(market, table, criteria)
    }

    /// Enter the loading stage, validate the criteria and resolve the market.
    fn start(&mut self, name: &str, criteria: &FilterCriteria) -> Result<Market> {
        self.stage = ScreeningStage::LoadingTickers;
        self.emit(ScreeningEvent::Started {
            market: name.to_string(),
        });
        criteria.validate()?;
        let market = self.markets()?.resolve(name)?;
        info!(market = %market.name, code = market.code(), "screening market");
        Ok(market)
    }

    fn filter(
        &mut self,
        market: Market,
        table: FundamentalsTable,
        criteria: &FilterCriteria,
    ) -> Result<ScreeningResult> {
        self.stage = ScreeningStage::ApplyingBaseline;
        let baseline = apply_baseline(&table)?;
        let filtered_path = self.store.save_filtered(market.code(), &baseline)?;
        let baseline_matches = baseline.len();
        self.emit(ScreeningEvent::BaselineApplied {
            matches: baseline_matches,
        });

        let table = if criteria.is_empty() {
            baseline
        } else {
            self.stage = ScreeningStage::ApplyingCustom;
            let refined = apply_custom(&baseline, *criteria)?;
            info!(before = baseline_matches, after = refined.len(), "custom filters applied");
            self.emit(ScreeningEvent::CustomApplied {
                before: baseline_matches,
                after: refined.len(),
            });
            refined
        };

        Ok(ScreeningResult {
            market,
            fetch: None,
            baseline_matches,
            filtered_path,
            table,
        })
    }

    fn finish(&mut self, outcome: Result<ScreeningResult>) -> Result<ScreeningResult> {
        match outcome {
            Ok(result) => {
                self.stage = ScreeningStage::Done;
                self.emit(ScreeningEvent::Completed {
                    matches: result.table.len(),
                });
                Ok(result)
            }
            Err(e) => {
                error!(stage = %self.stage, "screening failed: {e}");
                self.stage = ScreeningStage::Failed;
                self.emit(ScreeningEvent::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn emit(&self, event: ScreeningEvent) {
        self.sink.emit(TimestampedEvent::now(event));
    }
}
