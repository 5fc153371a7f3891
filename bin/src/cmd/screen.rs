//! Screen command implementation.

use crate::display;
use anyhow::Result;
use margin_filters::CriteriaRegistry;
use margin_fmp::FmpFetcher;
use margin_screen::{
    OfflineFetcher, ResultSummary, Screener, ScreenerConfig, default_export_name,
    store::write_table,
};
use margin_traits::{FilterCriteria, FundamentalsFetcher, TimestampedEvent};
use std::{path::PathBuf, sync::Arc};
use tracing::warn;

/// Options of the `screen` command.
pub(crate) struct ScreenOptions {
    pub(crate) market: String,
    pub(crate) criteria: FilterCriteria,
    pub(crate) graham_defaults: bool,
    pub(crate) offline: bool,
    pub(crate) export: Option<Option<PathBuf>>,
}

/// Screen a market and print the matches.
pub(crate) async fn run_screen(config: ScreenerConfig, options: ScreenOptions) -> Result<()> {
    let criteria = if options.graham_defaults {
        CriteriaRegistry::new(config.criteria_path())
            .load()?
            .merge(&options.criteria)
    } else {
        options.criteria
    };

    let fetcher: Arc<dyn FundamentalsFetcher> = if options.offline {
        Arc::new(OfflineFetcher)
    } else {
        Arc::new(FmpFetcher::from_env()?)
    };
    let mut screener =
        Screener::new(fetcher, config).with_sink(|event: TimestampedEvent| println!("{event}"));

    let cancel = screener.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current ticker");
            cancel.cancel();
        }
    });

    let outcome = if options.offline {
        screener.run_offline(&options.market, &criteria)
    } else {
        screener.run(&options.market, &criteria).await
    };
    interrupt.abort();
    let result = outcome?;

    display::print_results(&result.table)?;
    println!("{}", ResultSummary::from_table(&result.table)?);
    println!("Baseline output saved to {}", result.filtered_path.display());

    if let Some(path) = options.export {
        let path = path.unwrap_or_else(|| PathBuf::from(default_export_name(&result.market.name)));
        write_table(&path, &result.table)?;
        println!("Exported {} rows to {}", result.table.len(), path.display());
    }
    println!();

    Ok(())
}
