//! Terminal rendering helpers for the Margin CLI.

use anyhow::Result;
use margin_screen::format_for_display;
use margin_traits::FundamentalsTable;
use polars::prelude::*;

/// Column labels shown in the terminal, with their widths.
const SHOWN: [(&str, usize); 10] = [
    ("Symbol", 10),
    ("Company Name", 26),
    ("Current Price", 13),
    ("P/E Ratio", 9),
    ("P/B Ratio", 9),
    ("EPS", 8),
    ("Dividend Yield (%)", 18),
    ("Debt/Equity", 11),
    ("Current Ratio", 13),
    ("Market Cap (B)", 14),
];

/// Print a boxed section title.
pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{title:^62}║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// A display column rendered as text, `-` for missing values.
fn cells(df: &DataFrame, label: &str) -> Result<Vec<String>> {
    let series = df.column(label)?.as_materialized_series();
    if let Ok(values) = series.f64() {
        return Ok(values
            .into_iter()
            .map(|v| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")))
            .collect());
    }
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or("-").to_string())
        .collect())
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Print the result table, rounded and relabeled.
pub(crate) fn print_results(table: &FundamentalsTable) -> Result<()> {
    banner("Screening Results");

    if table.is_empty() {
        println!("No stocks matched. Try relaxing the filter criteria; the default");
        println!("Graham settings are strict for modern markets.");
        println!();
        return Ok(());
    }

    let formatted = format_for_display(table)?;
    let columns = SHOWN
        .iter()
        .map(|(label, _)| cells(&formatted, label))
        .collect::<Result<Vec<_>>>()?;

    let header: Vec<String> = SHOWN
        .iter()
        .map(|(label, width)| format!("{:<width$}", fit(label, *width)))
        .collect();
    println!("{}", header.join(" "));
    let rule = SHOWN.iter().map(|(_, w)| w + 1).sum::<usize>();
    println!("{}", "─".repeat(rule));

    for row in 0..formatted.height() {
        let line: Vec<String> = SHOWN
            .iter()
            .zip(&columns)
            .map(|((_, width), column)| format!("{:<width$}", fit(&column[row], *width)))
            .collect();
        println!("{}", line.join(" "));
    }
    println!();
    Ok(())
}
