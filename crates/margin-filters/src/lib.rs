//! Value-investing filters for fundamentals tables.
//!
//! This crate provides the two filtering stages of a screening run:
//! - [`GrahamBaseline`]: Benjamin Graham's fixed eight-inequality screen
//! - [`CustomFilter`]: a sparse set of user thresholds applied on top of it
//!
//! It also provides [`CriteriaRegistry`], which loads the default threshold
//! values offered to users.
//!
//! # Example
//!
//! ```ignore
//! use margin_filters::{CustomFilter, GrahamBaseline};
//! use margin_traits::{Criterion, FilterCriteria, TableFilter};
//!
//! let baseline = GrahamBaseline.apply(&table)?;
//! let criteria = FilterCriteria::new().with(Criterion::PeMax, Some(10.0));
//! let result = CustomFilter::new(criteria).apply(&baseline)?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod baseline;
mod custom;
pub mod registry;

pub use baseline::GrahamBaseline;
pub use custom::CustomFilter;
pub use registry::CriteriaRegistry;

use margin_traits::{FilterCriteria, FundamentalsTable, Result, TableFilter};

/// Apply the Graham baseline to `table`.
///
/// # Errors
///
/// Returns an error if the table cannot be filtered.
pub fn apply_baseline(table: &FundamentalsTable) -> Result<FundamentalsTable> {
    GrahamBaseline.apply(table)
}

/// Refine an already baseline-filtered `table` with `criteria`.
///
/// # Errors
///
/// Returns an error if a threshold is not finite or the table cannot be
/// filtered.
pub fn apply_custom(table: &FundamentalsTable, criteria: FilterCriteria) -> Result<FundamentalsTable> {
    criteria.validate()?;
    CustomFilter::new(criteria).apply(table)
}
