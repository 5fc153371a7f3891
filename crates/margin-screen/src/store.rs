//! Flat-file persistence for ticker lists and fundamentals tables.
//!
//! Every file is a headed CSV. Fundamentals tables use the
//! [`columns::ALL`] header and store absent metrics as empty fields.

use crate::ScreenerConfig;
use csv::{ReaderBuilder, WriterBuilder};
use margin_traits::{
    FundamentalsRecord, FundamentalsTable, Result, ScreenerError, TickerRecord, columns,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

const COMPANY_COLUMN: &str = "Company";

/// Read a ticker list.
///
/// The file must have a `Ticker` column. A `Company` column is optional and
/// other columns are ignored. Blank tickers are skipped.
///
/// # Errors
///
/// Returns [`ScreenerError::TickerListNotFound`] if the file does not exist,
/// [`ScreenerError::MissingColumn`] if it has no `Ticker` column, or a CSV
/// error if it cannot be parsed.
pub fn read_tickers(path: impl AsRef<Path>) -> Result<Vec<TickerRecord>> {
    let path = path.as_ref();
    let mut reader = match ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            let missing = matches!(
                e.kind(),
                csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::NotFound
            );
            return Err(if missing {
                ScreenerError::TickerListNotFound(path.to_path_buf())
            } else {
                e.into()
            });
        }
    };

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let ticker_idx = position(columns::TICKER)
        .ok_or_else(|| ScreenerError::MissingColumn(columns::TICKER.to_string()))?;
    let company_idx = position(COMPANY_COLUMN);

    let mut tickers = Vec::new();
    for row in reader.records() {
        let row = row?;
        let ticker = row.get(ticker_idx).unwrap_or_default().trim();
        if ticker.is_empty() {
            continue;
        }
        let company = company_idx
            .and_then(|i| row.get(i))
            .unwrap_or_default()
            .trim();
        tickers.push(TickerRecord::new(ticker, company));
    }

    debug!(path = %path.display(), count = tickers.len(), "read ticker list");
    Ok(tickers)
}

/// Write a ticker list with `Ticker,Company` headers.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_tickers(path: impl AsRef<Path>, tickers: &[TickerRecord]) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record([columns::TICKER, COMPANY_COLUMN])?;
    for ticker in tickers {
        writer.serialize(ticker)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a fundamentals table with raw, unformatted values.
///
/// An empty table still gets the full header.
///
/// # Errors
///
/// Returns an error if the table cannot be converted or the file cannot be
/// written.
pub fn write_table(path: impl AsRef<Path>, table: &FundamentalsTable) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(columns::ALL)?;
    for record in table.records()? {
        writer.serialize(&record)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}

/// Read a fundamentals table written by [`write_table`].
///
/// # Errors
///
/// Returns [`ScreenerError::MissingColumn`] if the file has no `Ticker`
/// column, or an error if it cannot be read or parsed.
pub fn read_table(path: impl AsRef<Path>) -> Result<FundamentalsTable> {
    let mut reader = ReaderBuilder::new().from_path(path.as_ref())?;
    if !reader.headers()?.iter().any(|h| h == columns::TICKER) {
        return Err(ScreenerError::MissingColumn(columns::TICKER.to_string()));
    }
    let records = reader
        .deserialize::<FundamentalsRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    FundamentalsTable::from_records(&records)
}

/// Default export file name for a market display name.
///
/// `"London Stock Exchange"` becomes
/// `graham_screener_london_stock_exchange.csv`.
#[must_use]
pub fn default_export_name(market_name: &str) -> String {
    format!(
        "graham_screener_{}.csv",
        market_name.to_lowercase().replace(' ', "_")
    )
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

/// Market-keyed file store laid out by a [`ScreenerConfig`].
#[derive(Debug, Clone)]
pub struct TableStore {
    config: ScreenerConfig,
}

impl TableStore {
    /// Create a store over the configured directories.
    #[must_use]
    pub const fn new(config: ScreenerConfig) -> Self {
        Self { config }
    }

    /// The configuration the store was built from.
    #[must_use]
    pub const fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Ticker list for a market code.
    ///
    /// # Errors
    ///
    /// See [`read_tickers`].
    pub fn load_tickers(&self, code: &str) -> Result<Vec<TickerRecord>> {
        read_tickers(self.config.ticker_list_path(code))
    }

    /// Replace the ticker list for a market code.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_tickers(&self, code: &str, tickers: &[TickerRecord]) -> Result<PathBuf> {
        let path = self.config.ticker_list_path(code);
        write_tickers(&path, tickers)?;
        Ok(path)
    }

    /// Overwrite the processed fundamentals for a market code.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_processed(&self, code: &str, table: &FundamentalsTable) -> Result<PathBuf> {
        let path = self.config.processed_path(code);
        write_table(&path, table)?;
        Ok(path)
    }

    /// Last processed fundamentals for a market code.
    ///
    /// # Errors
    ///
    /// Returns an error if no processed table exists or it cannot be read.
    pub fn load_processed(&self, code: &str) -> Result<FundamentalsTable> {
        let path = self.config.processed_path(code);
        if !path.exists() {
            return Err(ScreenerError::Other(format!(
                "No processed data for {code} at {}",
                path.display()
            )));
        }
        read_table(path)
    }

    /// Overwrite the baseline output for a market code.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_filtered(&self, code: &str, table: &FundamentalsTable) -> Result<PathBuf> {
        let path = self.config.filtered_path(code);
        write_table(&path, table)?;
        Ok(path)
    }
}
