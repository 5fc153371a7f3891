//! Filter trait for narrowing a fundamentals table.
//!
//! A filter is a row predicate expressed as a Polars expression. Rows where
//! the predicate is null (some referenced metric is missing) are dropped
//! along with rows where it is false, so missing data never passes.

use crate::{FundamentalsRecord, FundamentalsTable, Result};
use polars::prelude::*;

/// A stateless row filter over a [`FundamentalsTable`].
///
/// Implementations must be pure: `apply` returns a new table, keeps the
/// input's row order and never adds rows.
///
/// # Example
///
/// ```no_run
/// use margin_traits::{FundamentalsRecord, TableFilter, columns};
/// use polars::prelude::*;
///
/// struct Profitable;
///
/// impl TableFilter for Profitable {
///     fn name(&self) -> &str {
///         "profitable"
///     }
///
///     fn predicate(&self) -> Option<Expr> {
///         Some(col(columns::EPS).gt(lit(0.0)))
///     }
///
///     fn passes(&self, record: &FundamentalsRecord) -> bool {
///         record.eps.is_some_and(|eps| eps > 0.0)
///     }
/// }
/// ```
pub trait TableFilter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Row predicate, or `None` when the filter imposes no constraint.
    fn predicate(&self) -> Option<Expr>;

    /// Evaluate the predicate on a single record.
    ///
    /// Must agree with [`TableFilter::predicate`] on every record. The
    /// screening pipeline filters whole tables through [`TableFilter::apply`]
    /// and never calls this; it is the row-level reference that tests check
    /// `apply` against, and the form to use when only one record is at hand.
    fn passes(&self, record: &FundamentalsRecord) -> bool;

    /// Keep the rows of `table` that satisfy the predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the predicate cannot be evaluated against the
    /// table.
    fn apply(&self, table: &FundamentalsTable) -> Result<FundamentalsTable> {
        match self.predicate() {
            None => Ok(table.clone()),
            Some(predicate) => {
                let data = table.data().clone().lazy().filter(predicate).collect()?;
                FundamentalsTable::try_new(data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;

    struct Profitable;

    impl TableFilter for Profitable {
        fn name(&self) -> &str {
            "profitable"
        }

        fn predicate(&self) -> Option<Expr> {
            Some(col(columns::EPS).gt(lit(0.0)))
        }

        fn passes(&self, record: &FundamentalsRecord) -> bool {
            record.eps.is_some_and(|eps| eps > 0.0)
        }
    }

    struct Everything;

    impl TableFilter for Everything {
        fn name(&self) -> &str {
            "everything"
        }

        fn predicate(&self) -> Option<Expr> {
            None
        }

        fn passes(&self, _record: &FundamentalsRecord) -> bool {
            true
        }
    }

    fn record(ticker: &str, eps: Option<f64>) -> FundamentalsRecord {
        FundamentalsRecord {
            eps,
            ..FundamentalsRecord::new(ticker, "")
        }
    }

    fn table() -> FundamentalsTable {
        FundamentalsTable::from_records(&[
            record("A", Some(1.0)),
            record("B", None),
            record("C", Some(-2.0)),
            record("D", Some(0.5)),
        ])
        .unwrap()
    }

    #[test]
    fn test_apply_drops_missing_and_false() {
        let filtered = Profitable.apply(&table()).unwrap();
        assert_eq!(filtered.tickers().unwrap(), vec!["A", "D"]);
    }

    #[test]
    fn test_apply_agrees_with_passes() {
        let input = table();
        let expected: Vec<String> = input
            .records()
            .unwrap()
            .into_iter()
            .filter(|r| Profitable.passes(r))
            .map(|r| r.ticker)
            .collect();
        assert_eq!(Profitable.apply(&input).unwrap().tickers().unwrap(), expected);
    }

    #[test]
    fn test_no_predicate_returns_copy() {
        let input = table();
        let output = Everything.apply(&input).unwrap();
        assert_eq!(output.len(), input.len());
        assert_eq!(output.tickers().unwrap(), input.tickers().unwrap());
    }
}
