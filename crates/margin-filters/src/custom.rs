//! User-adjustable threshold refinement.

use margin_traits::{Criterion, FilterCriteria, FundamentalsRecord, TableFilter, columns};
use polars::prelude::*;

/// Refines a table with a sparse set of user thresholds.
///
/// Every set threshold is an inclusive bound (`<=` for maxima, `>=` for
/// minima) compared in table units. Unset thresholds impose no constraint,
/// so an empty [`FilterCriteria`] keeps every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomFilter {
    criteria: FilterCriteria,
}

impl CustomFilter {
    /// Create a filter from user-unit criteria.
    #[must_use]
    pub const fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// The criteria in user units.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }
}

/// Expression for the value a criterion is compared against.
fn metric_expr(criterion: Criterion) -> Expr {
    match criterion {
        Criterion::PePbMax => col(columns::PE) * col(columns::PB),
        other => col(other.columns()[0]),
    }
}

/// Record value a criterion is compared against.
fn metric_value(criterion: Criterion, record: &FundamentalsRecord) -> Option<f64> {
    match criterion {
        Criterion::PeMax => record.pe,
        Criterion::PbMax => record.pb,
        Criterion::PePbMax => record.pe.zip(record.pb).map(|(pe, pb)| pe * pb),
        Criterion::DebtToEquityMax => record.debt_to_equity,
        Criterion::CurrentRatioMin => record.current_ratio,
        Criterion::DividendYieldMin => record.dividend_yield,
        Criterion::EpsMin => record.eps,
        Criterion::MarketCapMin => record.market_cap,
    }
}

impl TableFilter for CustomFilter {
    fn name(&self) -> &str {
        "custom"
    }

    fn predicate(&self) -> Option<Expr> {
        self.criteria
            .active()
            .map(|(criterion, value)| {
                let bound = lit(criterion.to_table_units(value));
                let metric = metric_expr(criterion);
                if criterion.is_max() {
                    metric.lt_eq(bound)
                } else {
                    metric.gt_eq(bound)
                }
            })
            .reduce(Expr::and)
    }

    fn passes(&self, record: &FundamentalsRecord) -> bool {
        self.criteria.active().all(|(criterion, value)| {
            let bound = criterion.to_table_units(value);
            metric_value(criterion, record).is_some_and(|metric| {
                if criterion.is_max() {
                    metric <= bound
                } else {
                    metric >= bound
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrahamBaseline;
    use margin_traits::FundamentalsTable;

    fn record(ticker: &str) -> FundamentalsRecord {
        FundamentalsRecord {
            price: Some(30.0),
            pe: Some(12.0),
            pb: Some(1.2),
            eps: Some(2.5),
            dividend_yield: Some(0.03),
            debt_to_equity: Some(0.3),
            current_ratio: Some(2.0),
            market_cap: Some(1_000_000_000.0),
            ..FundamentalsRecord::new(ticker, "")
        }
    }

    fn varied() -> FundamentalsTable {
        let records: Vec<FundamentalsRecord> = (0..12)
            .map(|i| {
                let f = f64::from(i);
                FundamentalsRecord {
                    pe: Some(4.0 + f),
                    pb: Some(0.4 + f * 0.1),
                    dividend_yield: Some(0.021 + f * 0.002),
                    market_cap: Some(6.0e8 + f * 1.0e8),
                    ..record(&format!("S{i:02}"))
                }
            })
            .collect();
        FundamentalsTable::from_records(&records).unwrap()
    }

    fn run(table: &FundamentalsTable, criteria: FilterCriteria) -> Vec<String> {
        CustomFilter::new(criteria).apply(table).unwrap().tickers().unwrap()
    }

    #[test]
    fn test_dividend_yield_in_percent() {
        let table = FundamentalsTable::from_records(&[FundamentalsRecord {
            dividend_yield: Some(0.025),
            ..record("DIV")
        }])
        .unwrap();

        let strict = FilterCriteria::new().with(Criterion::DividendYieldMin, Some(3.0));
        let loose = FilterCriteria::new().with(Criterion::DividendYieldMin, Some(2.0));
        assert!(run(&table, strict).is_empty());
        assert_eq!(run(&table, loose), vec!["DIV"]);
    }

    #[test]
    fn test_empty_criteria_is_noop() {
        let baseline = GrahamBaseline.apply(&varied()).unwrap();
        let filter = CustomFilter::new(FilterCriteria::new());
        assert!(filter.predicate().is_none());
        assert_eq!(run(&baseline, FilterCriteria::new()), baseline.tickers().unwrap());
    }

    #[test]
    fn test_tightening_never_grows_result() {
        let baseline = GrahamBaseline.apply(&varied()).unwrap();
        let mut previous = usize::MAX;
        for pe_max in [14.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0] {
            let criteria = FilterCriteria::new()
                .with(Criterion::PeMax, Some(pe_max))
                .with(Criterion::MarketCapMin, Some(700.0));
            let count = run(&baseline, criteria).len();
            assert!(count <= previous, "pe_max {pe_max} grew result");
            previous = count;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let table = FundamentalsTable::from_records(&[record("EDGE")]).unwrap();
        let criteria = FilterCriteria::new()
            .with(Criterion::PeMax, Some(12.0))
            .with(Criterion::PbMax, Some(1.2))
            .with(Criterion::DebtToEquityMax, Some(0.3))
            .with(Criterion::CurrentRatioMin, Some(2.0))
            .with(Criterion::EpsMin, Some(2.5))
            .with(Criterion::MarketCapMin, Some(1000.0));
        assert!(CustomFilter::new(criteria).passes(&record("EDGE")));
        assert_eq!(run(&table, criteria), vec!["EDGE"]);
    }

    #[test]
    fn test_market_cap_in_millions() {
        let table = FundamentalsTable::from_records(&[
            FundamentalsRecord {
                market_cap: Some(750_000_000.0),
                ..record("MID")
            },
            FundamentalsRecord {
                market_cap: Some(2_000_000_000.0),
                ..record("BIG")
            },
        ])
        .unwrap();
        let criteria = FilterCriteria::new().with(Criterion::MarketCapMin, Some(1000.0));
        assert_eq!(run(&table, criteria), vec!["BIG"]);
    }

    #[test]
    fn test_product_threshold() {
        let table = FundamentalsTable::from_records(&[
            record("LOW"),
            FundamentalsRecord {
                pe: Some(14.0),
                pb: Some(1.4),
                ..record("HIGH")
            },
        ])
        .unwrap();
        let criteria = FilterCriteria::new().with(Criterion::PePbMax, Some(15.0));
        assert_eq!(run(&table, criteria), vec!["LOW"]);
    }

    #[test]
    fn test_missing_metric_fails_set_criterion_only() {
        let gap = FundamentalsRecord {
            eps: None,
            ..record("GAP")
        };
        let table = FundamentalsTable::from_records(&[gap.clone()]).unwrap();

        let on_pe = FilterCriteria::new().with(Criterion::PeMax, Some(20.0));
        let on_eps = FilterCriteria::new().with(Criterion::EpsMin, Some(-5.0));
        assert_eq!(run(&table, on_pe), vec!["GAP"]);
        assert!(run(&table, on_eps).is_empty());
        assert!(!CustomFilter::new(on_eps).passes(&gap));
    }

    #[test]
    fn test_matches_record_check_and_keeps_order() {
        let table = varied();
        let criteria = FilterCriteria::new()
            .with(Criterion::PbMax, Some(1.0))
            .with(Criterion::DividendYieldMin, Some(2.5));
        let filter = CustomFilter::new(criteria);
        let expected: Vec<String> = table
            .records()
            .unwrap()
            .into_iter()
            .filter(|r| filter.passes(r))
            .map(|r| r.ticker)
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(run(&table, criteria), expected);
    }
}
