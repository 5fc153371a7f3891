//! Record and table types shared by every screening stage.
//!
//! A [`FundamentalsRecord`] is one fetched snapshot for one ticker. The
//! filters work on [`FundamentalsTable`], a Polars DataFrame with one column
//! per record field. Absent metrics are nulls in the table, so every
//! comparison against them evaluates to null and the row is dropped.

use crate::{Result, ScreenerError};
use chrono::{Local, NaiveDateTime, SubsecRound};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names of the fundamentals table, in stored order.
pub mod columns {
    /// Exchange-suffixed ticker symbol.
    pub const TICKER: &str = "Ticker";
    /// Company short name.
    pub const NAME: &str = "Name";
    /// Current price.
    pub const PRICE: &str = "Price";
    /// Trailing price/earnings.
    pub const PE: &str = "PE";
    /// Price/book.
    pub const PB: &str = "PB";
    /// Trailing earnings per share.
    pub const EPS: &str = "EPS";
    /// Dividend yield as a fraction.
    pub const DIVIDEND_YIELD: &str = "DividendYield";
    /// Debt/equity.
    pub const DEBT_TO_EQUITY: &str = "DebtToEquity";
    /// Current ratio.
    pub const CURRENT_RATIO: &str = "CurrentRatio";
    /// Market capitalization in currency units.
    pub const MARKET_CAP: &str = "MarketCap";
    /// Fetch timestamp.
    pub const LAST_UPDATED: &str = "LastUpdated";

    /// The eight tracked metrics.
    pub const METRICS: [&str; 8] = [
        PRICE,
        PE,
        PB,
        EPS,
        DIVIDEND_YIELD,
        DEBT_TO_EQUITY,
        CURRENT_RATIO,
        MARKET_CAP,
    ];

    /// Every column, in stored order.
    pub const ALL: [&str; 11] = [
        TICKER,
        NAME,
        PRICE,
        PE,
        PB,
        EPS,
        DIVIDEND_YIELD,
        DEBT_TO_EQUITY,
        CURRENT_RATIO,
        MARKET_CAP,
        LAST_UPDATED,
    ];
}

/// Format of the `LastUpdated` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wall-clock local time truncated to whole seconds.
#[must_use]
pub fn fetch_timestamp() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// One entry of a market's ticker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Exchange-suffixed symbol.
    #[serde(rename = "Ticker")]
    pub ticker: String,
    /// Company name as listed by the exchange.
    #[serde(rename = "Company", default)]
    pub company: String,
}

impl TickerRecord {
    /// Create a ticker record.
    pub fn new(ticker: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            company: company.into(),
        }
    }
}

/// Fundamentals snapshot for a single ticker.
///
/// Field order matches the stored CSV header. Numeric fields are `None`
/// when the provider did not report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    /// Ticker symbol (unique key).
    #[serde(rename = "Ticker")]
    pub ticker: String,
    /// Company short name, possibly empty.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Current price.
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    /// Trailing price/earnings.
    #[serde(rename = "PE")]
    pub pe: Option<f64>,
    /// Price/book.
    #[serde(rename = "PB")]
    pub pb: Option<f64>,
    /// Trailing earnings per share.
    #[serde(rename = "EPS")]
    pub eps: Option<f64>,
    /// Dividend yield as a fraction (0.02 = 2%).
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<f64>,
    /// Debt/equity.
    #[serde(rename = "DebtToEquity")]
    pub debt_to_equity: Option<f64>,
    /// Current ratio.
    #[serde(rename = "CurrentRatio")]
    pub current_ratio: Option<f64>,
    /// Market capitalization in currency units.
    #[serde(rename = "MarketCap")]
    pub market_cap: Option<f64>,
    /// When the snapshot was fetched (local time, second precision).
    #[serde(rename = "LastUpdated", with = "timestamp")]
    pub last_updated: NaiveDateTime,
}

impl FundamentalsRecord {
    /// Create a record with no metrics, stamped with the current time.
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            price: None,
            pe: None,
            pb: None,
            eps: None,
            dividend_yield: None,
            debt_to_equity: None,
            current_ratio: None,
            market_cap: None,
            last_updated: fetch_timestamp(),
        }
    }

    /// The eight tracked metrics in [`columns::METRICS`] order.
    #[must_use]
    pub const fn metrics(&self) -> [Option<f64>; 8] {
        [
            self.price,
            self.pe,
            self.pb,
            self.eps,
            self.dividend_yield,
            self.debt_to_equity,
            self.current_ratio,
            self.market_cap,
        ]
    }

    /// Whether the provider reported at least one tracked metric.
    ///
    /// Records without any metric are never stored.
    #[must_use]
    pub fn has_metrics(&self) -> bool {
        self.metrics().iter().any(Option::is_some)
    }
}

/// Tabular form of a set of fundamentals records.
///
/// The wrapped DataFrame always has the eleven [`columns::ALL`] columns in
/// stored order, with the metric columns typed `Float64`. Row order is
/// meaningful: it is the order tickers appeared in the market's list.
#[derive(Debug, Clone)]
pub struct FundamentalsTable {
    data: DataFrame,
}

impl FundamentalsTable {
    /// Build a table from records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be constructed.
    pub fn from_records(records: &[FundamentalsRecord]) -> Result<Self> {
        // NaN would order above every threshold; store it as missing.
        let metric = |f: fn(&FundamentalsRecord) -> Option<f64>| -> Vec<Option<f64>> {
            records
                .iter()
                .map(|r| f(r).filter(|v| !v.is_nan()))
                .collect()
        };

        let data = df! {
            columns::TICKER => records.iter().map(|r| r.ticker.as_str()).collect::<Vec<_>>(),
            columns::NAME => records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            columns::PRICE => metric(|r| r.price),
            columns::PE => metric(|r| r.pe),
            columns::PB => metric(|r| r.pb),
            columns::EPS => metric(|r| r.eps),
            columns::DIVIDEND_YIELD => metric(|r| r.dividend_yield),
            columns::DEBT_TO_EQUITY => metric(|r| r.debt_to_equity),
            columns::CURRENT_RATIO => metric(|r| r.current_ratio),
            columns::MARKET_CAP => metric(|r| r.market_cap),
            columns::LAST_UPDATED => records
                .iter()
                .map(|r| r.last_updated.format(TIMESTAMP_FORMAT).to_string())
                .collect::<Vec<_>>(),
        }?;

        Ok(Self { data })
    }

    /// Wrap an existing DataFrame.
    ///
    /// Metric columns are cast to `Float64` and the columns are put in
    /// stored order; extra columns are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::MissingColumn`] if any fundamentals column
    /// is absent.
    pub fn try_new(data: DataFrame) -> Result<Self> {
        let names = data.get_column_names();
        if let Some(missing) = columns::ALL
            .iter()
            .find(|c| !names.iter().any(|n| n.as_str() == **c))
        {
            return Err(ScreenerError::MissingColumn((*missing).to_string()));
        }

        let mut exprs: Vec<Expr> = vec![
            col(columns::TICKER).cast(DataType::String),
            col(columns::NAME).cast(DataType::String),
        ];
        exprs.extend(
            columns::METRICS
                .iter()
                .map(|c| col(*c).cast(DataType::Float64)),
        );
        exprs.push(col(columns::LAST_UPDATED).cast(DataType::String));

        let data = data.lazy().select(exprs).collect()?;
        Ok(Self { data })
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Ticker column in row order.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker column is not a string column.
    pub fn tickers(&self) -> Result<Vec<String>> {
        Ok(self
            .data
            .column(columns::TICKER)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|t| t.unwrap_or_default().to_string())
            .collect())
    }

    /// Convert the table back into records, in row order.
    ///
    /// # Errors
    ///
    /// Returns an error if a column has the wrong type or a timestamp
    /// cannot be parsed.
    pub fn records(&self) -> Result<Vec<FundamentalsRecord>> {
        let df = &self.data;
        let text = |name: &str| -> Result<StringChunked> {
            Ok(df.column(name)?.as_materialized_series().str()?.clone())
        };
        let number = |name: &str| -> Result<Float64Chunked> {
            Ok(df.column(name)?.as_materialized_series().f64()?.clone())
        };

        let tickers = text(columns::TICKER)?;
        let names = text(columns::NAME)?;
        let stamps = text(columns::LAST_UPDATED)?;
        let [price, pe, pb, eps, dividend_yield, debt_to_equity, current_ratio, market_cap] =
            [
                number(columns::PRICE)?,
                number(columns::PE)?,
                number(columns::PB)?,
                number(columns::EPS)?,
                number(columns::DIVIDEND_YIELD)?,
                number(columns::DEBT_TO_EQUITY)?,
                number(columns::CURRENT_RATIO)?,
                number(columns::MARKET_CAP)?,
            ];

        (0..df.height())
            .map(|i| {
                let stamp = stamps.get(i).unwrap_or_default();
                let last_updated = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
                    .map_err(|e| {
                        ScreenerError::InvalidData(format!("bad timestamp {stamp:?}: {e}"))
                    })?;
                Ok(FundamentalsRecord {
                    ticker: tickers.get(i).unwrap_or_default().to_string(),
                    name: names.get(i).unwrap_or_default().to_string(),
                    price: price.get(i),
                    pe: pe.get(i),
                    pb: pb.get(i),
                    eps: eps.get(i),
                    dividend_yield: dividend_yield.get(i),
                    debt_to_equity: debt_to_equity.get(i),
                    current_ratio: current_ratio.get(i),
                    market_cap: market_cap.get(i),
                    last_updated,
                })
            })
            .collect()
    }
}

impl AsRef<DataFrame> for FundamentalsTable {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

/// Serde adapter for the `LastUpdated` text format.
mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn record(ticker: &str, pe: Option<f64>) -> FundamentalsRecord {
        FundamentalsRecord {
            pe,
            market_cap: Some(2.0e9),
            last_updated: stamp(),
            ..FundamentalsRecord::new(ticker, format!("{ticker} Corp"))
        }
    }

    #[test]
    fn test_has_metrics() {
        let empty = FundamentalsRecord::new("ZZZ.L", "");
        assert!(!empty.has_metrics());

        let with_price = FundamentalsRecord {
            price: Some(10.0),
            ..empty
        };
        assert!(with_price.has_metrics());
    }

    #[test]
    fn test_fetch_timestamp_has_no_subseconds() {
        use chrono::Timelike;
        assert_eq!(fetch_timestamp().nanosecond(), 0);
    }

    #[test]
    fn test_table_from_records() {
        let table =
            FundamentalsTable::from_records(&[record("AAA", Some(12.0)), record("BBB", None)])
                .unwrap();

        assert_eq!(table.len(), 2);
        let names: Vec<&str> = table
            .data()
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(names, columns::ALL.to_vec());
        assert_eq!(table.tickers().unwrap(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn test_empty_table_keeps_schema() {
        let table = FundamentalsTable::from_records(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.data().width(), columns::ALL.len());
        assert_eq!(
            table.data().column(columns::PE).unwrap().dtype(),
            &DataType::Float64
        );
    }

    #[test]
    fn test_records_round_trip_preserves_missing() {
        let input = vec![record("AAA", Some(12.0)), record("BBB", None)];
        let table = FundamentalsTable::from_records(&input).unwrap();
        assert_eq!(table.records().unwrap(), input);
    }

    #[test]
    fn test_try_new_rejects_missing_column() {
        let df = df! {
            "Ticker" => &["AAA"],
            "PE" => &[10.0],
        }
        .unwrap();

        let err = FundamentalsTable::try_new(df).unwrap_err();
        assert!(matches!(err, ScreenerError::MissingColumn(ref c) if c == "Name"));
    }

    #[test]
    fn test_try_new_casts_integer_metrics() {
        let df = df! {
            "LastUpdated" => &["2024-03-01 09:30:00"],
            "Ticker" => &["AAA"],
            "Name" => &["Alpha"],
            "Price" => &[10i64],
            "PE" => &[12i64],
            "PB" => &[1.0],
            "EPS" => &[1.0],
            "DividendYield" => &[0.03],
            "DebtToEquity" => &[0.2],
            "CurrentRatio" => &[2.0],
            "MarketCap" => &[1_000_000_000i64],
            "Extra" => &["dropped"],
        }
        .unwrap();

        let table = FundamentalsTable::try_new(df).unwrap();
        assert_eq!(table.data().width(), columns::ALL.len());
        assert_eq!(
            table.data().column(columns::PE).unwrap().dtype(),
            &DataType::Float64
        );
        let records = table.records().unwrap();
        assert_eq!(records[0].pe, Some(12.0));
        assert_eq!(records[0].last_updated, stamp());
    }

    #[test]
    fn test_record_csv_header_order() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(record("AAA", None)).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, columns::ALL.join(","));
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("AAA,AAA Corp,,,"));
        assert!(row.ends_with(",2024-03-01 09:30:00"));
    }
}
