//! Graham's baseline value screen.

use margin_traits::{FundamentalsRecord, TableFilter, columns};
use polars::prelude::*;

const PE_MAX: f64 = 15.0;
const PB_MAX: f64 = 1.5;
const PE_PB_MAX: f64 = 22.5;
const DEBT_TO_EQUITY_MAX: f64 = 0.5;
const CURRENT_RATIO_MIN: f64 = 1.5;
const DIVIDEND_YIELD_MIN: f64 = 0.02;
const EPS_MIN: f64 = 0.0;
const MARKET_CAP_MIN: f64 = 500_000_000.0;

/// Benjamin Graham's fixed value-investing screen.
///
/// A row passes when all of these hold, in raw table units:
///
/// | metric | condition |
/// |---|---|
/// | P/E | < 15 |
/// | P/B | < 1.5 |
/// | P/E × P/B | < 22.5 |
/// | debt/equity | < 0.5 |
/// | current ratio | > 1.5 |
/// | dividend yield | > 0.02 |
/// | EPS | > 0 |
/// | market cap | > 500,000,000 |
///
/// Every comparison is strict and unrounded. A row missing any of these
/// metrics fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrahamBaseline;

impl TableFilter for GrahamBaseline {
    fn name(&self) -> &str {
        "graham_baseline"
    }

    fn predicate(&self) -> Option<Expr> {
        Some(
            col(columns::PE)
                .lt(lit(PE_MAX))
                .and(col(columns::PB).lt(lit(PB_MAX)))
                .and((col(columns::PE) * col(columns::PB)).lt(lit(PE_PB_MAX)))
                .and(col(columns::DEBT_TO_EQUITY).lt(lit(DEBT_TO_EQUITY_MAX)))
                .and(col(columns::CURRENT_RATIO).gt(lit(CURRENT_RATIO_MIN)))
                .and(col(columns::DIVIDEND_YIELD).gt(lit(DIVIDEND_YIELD_MIN)))
                .and(col(columns::EPS).gt(lit(EPS_MIN)))
                .and(col(columns::MARKET_CAP).gt(lit(MARKET_CAP_MIN))),
        )
    }

    fn passes(&self, record: &FundamentalsRecord) -> bool {
        let (
            Some(pe),
            Some(pb),
            Some(debt_to_equity),
            Some(current_ratio),
            Some(dividend_yield),
            Some(eps),
            Some(market_cap),
        ) = (
            record.pe,
            record.pb,
            record.debt_to_equity,
            record.current_ratio,
            record.dividend_yield,
            record.eps,
            record.market_cap,
        )
        else {
            return false;
        };

        pe < PE_MAX
            && pb < PB_MAX
            && pe * pb < PE_PB_MAX
            && debt_to_equity < DEBT_TO_EQUITY_MAX
            && current_ratio > CURRENT_RATIO_MIN
            && dividend_yield > DIVIDEND_YIELD_MIN
            && eps > EPS_MIN
            && market_cap > MARKET_CAP_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_traits::FundamentalsTable;

    fn qualifying(ticker: &str) -> FundamentalsRecord {
        FundamentalsRecord {
            price: Some(30.0),
            pe: Some(12.0),
            pb: Some(1.2),
            eps: Some(2.5),
            dividend_yield: Some(0.03),
            debt_to_equity: Some(0.3),
            current_ratio: Some(2.0),
            market_cap: Some(1_000_000_000.0),
            ..FundamentalsRecord::new(ticker, format!("{ticker} plc"))
        }
    }

    fn tickers(records: &[FundamentalsRecord]) -> Vec<String> {
        let table = FundamentalsTable::from_records(records).unwrap();
        GrahamBaseline.apply(&table).unwrap().tickers().unwrap()
    }

    #[test]
    fn test_classic_value_stock_passes() {
        let record = qualifying("GOOD");
        assert!(GrahamBaseline.passes(&record));
        assert_eq!(tickers(&[record]), vec!["GOOD"]);
    }

    #[test]
    fn test_high_pe_fails() {
        let record = FundamentalsRecord {
            pe: Some(20.0),
            ..qualifying("PRICEY")
        };
        assert!(!GrahamBaseline.passes(&record));
        assert!(tickers(&[record]).is_empty());
    }

    #[test]
    fn test_missing_pe_never_passes() {
        let record = FundamentalsRecord {
            pe: None,
            ..qualifying("NOPE")
        };
        assert!(!GrahamBaseline.passes(&record));
        assert!(tickers(&[record]).is_empty());
    }

    #[test]
    fn test_any_missing_metric_fails() {
        let blanks: [fn(&mut FundamentalsRecord); 7] = [
            |r| r.pe = None,
            |r| r.pb = None,
            |r| r.eps = None,
            |r| r.dividend_yield = None,
            |r| r.debt_to_equity = None,
            |r| r.current_ratio = None,
            |r| r.market_cap = None,
        ];
        for blank in blanks {
            let mut record = qualifying("GAP");
            blank(&mut record);
            assert!(tickers(&[record]).is_empty());
        }
    }

    #[test]
    fn test_missing_price_is_not_required() {
        let record = FundamentalsRecord {
            price: None,
            ..qualifying("NOPRICE")
        };
        assert_eq!(tickers(&[record]), vec!["NOPRICE"]);
    }

    #[test]
    fn test_boundaries_are_strict() {
        let edges = [
            FundamentalsRecord {
                pe: Some(15.0),
                pb: Some(1.0),
                ..qualifying("PE_EDGE")
            },
            FundamentalsRecord {
                pb: Some(1.5),
                pe: Some(10.0),
                ..qualifying("PB_EDGE")
            },
            FundamentalsRecord {
                debt_to_equity: Some(0.5),
                ..qualifying("DE_EDGE")
            },
            FundamentalsRecord {
                current_ratio: Some(1.5),
                ..qualifying("CR_EDGE")
            },
            FundamentalsRecord {
                dividend_yield: Some(0.02),
                ..qualifying("DY_EDGE")
            },
            FundamentalsRecord {
                eps: Some(0.0),
                ..qualifying("EPS_EDGE")
            },
            FundamentalsRecord {
                market_cap: Some(500_000_000.0),
                ..qualifying("MC_EDGE")
            },
        ];
        for record in &edges {
            assert!(!GrahamBaseline.passes(record), "{} passed", record.ticker);
        }
        assert!(tickers(&edges).is_empty());
    }

    #[test]
    fn test_output_is_ordered_subset_matching_passes() {
        let records: Vec<FundamentalsRecord> = (0..40)
            .map(|i| {
                let f = f64::from(i);
                FundamentalsRecord {
                    pe: if i % 7 == 0 { None } else { Some(5.0 + f * 0.5) },
                    pb: Some(0.5 + (f % 5.0) * 0.3),
                    eps: Some(f - 3.0),
                    dividend_yield: Some(0.01 + (f % 4.0) * 0.01),
                    debt_to_equity: Some((f % 3.0) * 0.3),
                    current_ratio: Some(1.0 + (f % 6.0) * 0.25),
                    market_cap: Some(1.0e8 * f),
                    ..qualifying(&format!("T{i:02}"))
                }
            })
            .collect();

        let expected: Vec<String> = records
            .iter()
            .filter(|r| GrahamBaseline.passes(r))
            .map(|r| r.ticker.clone())
            .collect();
        let output = tickers(&records);

        assert_eq!(output, expected);
        assert!(output.contains(&"T10".to_string()));
        assert!(output.len() < records.len());
        let input: Vec<String> = records.iter().map(|r| r.ticker.clone()).collect();
        assert!(output.iter().all(|t| input.contains(t)));
    }

    #[test]
    fn test_input_table_untouched() {
        let table = FundamentalsTable::from_records(&[qualifying("A"), FundamentalsRecord {
            pe: Some(40.0),
            ..qualifying("B")
        }])
        .unwrap();
        let filtered = GrahamBaseline.apply(&table).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(table.len(), 2);
    }
}
