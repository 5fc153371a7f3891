//! Presentation helpers for result tables.
//!
//! Nothing here feeds back into screening. Exports always use the raw
//! table, see [`crate::store::write_table`].

use margin_traits::{FundamentalsTable, Result, columns};
use polars::prelude::*;

/// Display labels, paired with the stored column they come from.
pub const DISPLAY_LABELS: [(&str, &str); 11] = [
    (columns::TICKER, "Symbol"),
    (columns::NAME, "Company Name"),
    (columns::PRICE, "Current Price"),
    (columns::PE, "P/E Ratio"),
    (columns::PB, "P/B Ratio"),
    (columns::EPS, "EPS"),
    (columns::DIVIDEND_YIELD, "Dividend Yield (%)"),
    (columns::DEBT_TO_EQUITY, "Debt/Equity"),
    (columns::CURRENT_RATIO, "Current Ratio"),
    (columns::MARKET_CAP, "Market Cap (B)"),
    (columns::LAST_UPDATED, "Last Updated"),
];

const ROUNDED: [&str; 5] = [
    columns::PE,
    columns::PB,
    columns::DIVIDEND_YIELD,
    columns::CURRENT_RATIO,
    columns::DEBT_TO_EQUITY,
];

/// Relabel and round a result table for display.
///
/// Ratio columns are rounded to two decimals and market cap is shown in
/// billions. The input table is not modified.
///
/// # Errors
///
/// Returns an error if the table cannot be evaluated.
pub fn format_for_display(table: &FundamentalsTable) -> Result<DataFrame> {
    let exprs: Vec<Expr> = DISPLAY_LABELS
        .iter()
        .map(|&(column, label)| {
            let expr = if column == columns::MARKET_CAP {
                (col(column) / lit(1e9)).round(2)
            } else if ROUNDED.contains(&column) {
                col(column).round(2)
            } else {
                col(column)
            };
            expr.alias(label)
        })
        .collect();

    Ok(table.data().clone().lazy().select(exprs).collect()?)
}

/// Headline numbers for a result table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultSummary {
    /// Rows in the table.
    pub total: usize,
    /// Mean P/E over rows that have one.
    pub avg_pe: Option<f64>,
    /// Mean P/B over rows that have one.
    pub avg_pb: Option<f64>,
    /// Mean dividend yield, as a fraction, over rows that have one.
    pub avg_dividend_yield: Option<f64>,
}

impl ResultSummary {
    /// Summarize `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric column is not numeric.
    pub fn from_table(table: &FundamentalsTable) -> Result<Self> {
        let df = table.data();
        let mean = |name: &str| -> Result<Option<f64>> {
            Ok(df.column(name)?.as_materialized_series().f64()?.mean())
        };
        Ok(Self {
            total: df.height(),
            avg_pe: mean(columns::PE)?,
            avg_pb: mean(columns::PB)?,
            avg_dividend_yield: mean(columns::DIVIDEND_YIELD)?,
        })
    }
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<f64>, scale: f64, unit: &str| {
            v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}{unit}", v * scale))
        };
        write!(
            f,
            "Total Stocks: {} | Avg P/E: {} | Avg P/B: {} | Avg Div Yield: {}",
            self.total,
            show(self.avg_pe, 1.0, ""),
            show(self.avg_pb, 1.0, ""),
            show(self.avg_dividend_yield, 100.0, "%"),
        )
    }
}
