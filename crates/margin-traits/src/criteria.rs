//! User-adjustable filter thresholds.
//!
//! [`FilterCriteria`] is a sparse set of up to eight thresholds. Each is
//! expressed in the units a user sees: dividend yield in percent and market
//! capitalization in millions. Conversion to the raw table units happens in
//! [`FilterCriteria::threshold`].

use crate::{Result, ScreenerError, columns};
use serde::{Deserialize, Serialize};

/// One of the eight adjustable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Maximum trailing P/E.
    PeMax,
    /// Maximum P/B.
    PbMax,
    /// Maximum P/E × P/B.
    PePbMax,
    /// Maximum debt/equity.
    DebtToEquityMax,
    /// Minimum current ratio.
    CurrentRatioMin,
    /// Minimum dividend yield, in percent.
    DividendYieldMin,
    /// Minimum EPS.
    EpsMin,
    /// Minimum market capitalization, in millions.
    MarketCapMin,
}

/// Allowed range and step for a threshold control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionBounds {
    /// Smallest selectable value.
    pub min: f64,
    /// Largest selectable value.
    pub max: f64,
    /// Step between selectable values.
    pub step: f64,
}

impl Criterion {
    /// All criteria in canonical order.
    pub const ALL: [Self; 8] = [
        Self::PeMax,
        Self::PbMax,
        Self::PePbMax,
        Self::DebtToEquityMax,
        Self::CurrentRatioMin,
        Self::DividendYieldMin,
        Self::EpsMin,
        Self::MarketCapMin,
    ];

    /// Key used in criteria files.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::PeMax => "pe_max",
            Self::PbMax => "pb_max",
            Self::PePbMax => "pe_pb_max",
            Self::DebtToEquityMax => "debt_to_equity_max",
            Self::CurrentRatioMin => "current_ratio_min",
            Self::DividendYieldMin => "dividend_yield_min",
            Self::EpsMin => "eps_min",
            Self::MarketCapMin => "market_cap_min",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PeMax => "P/E Ratio (Max)",
            Self::PbMax => "P/B Ratio (Max)",
            Self::PePbMax => "P/E × P/B (Max)",
            Self::DebtToEquityMax => "Debt/Equity (Max)",
            Self::CurrentRatioMin => "Current Ratio (Min)",
            Self::DividendYieldMin => "Dividend Yield % (Min)",
            Self::EpsMin => "EPS (Min)",
            Self::MarketCapMin => "Market Cap (Min, $M)",
        }
    }

    /// Whether the threshold is an upper bound.
    #[must_use]
    pub const fn is_max(&self) -> bool {
        matches!(
            self,
            Self::PeMax | Self::PbMax | Self::PePbMax | Self::DebtToEquityMax
        )
    }

    /// Table columns the threshold is compared against.
    ///
    /// `PePbMax` compares the product of both columns.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::PeMax => &[columns::PE],
            Self::PbMax => &[columns::PB],
            Self::PePbMax => &[columns::PE, columns::PB],
            Self::DebtToEquityMax => &[columns::DEBT_TO_EQUITY],
            Self::CurrentRatioMin => &[columns::CURRENT_RATIO],
            Self::DividendYieldMin => &[columns::DIVIDEND_YIELD],
            Self::EpsMin => &[columns::EPS],
            Self::MarketCapMin => &[columns::MARKET_CAP],
        }
    }

    /// Convert a user-unit value into table units.
    ///
    /// Dividend yield is entered in percent, market cap in millions.
    #[must_use]
    pub fn to_table_units(&self, value: f64) -> f64 {
        match self {
            Self::DividendYieldMin => value / 100.0,
            Self::MarketCapMin => value * 1_000_000.0,
            _ => value,
        }
    }

    /// Range of the threshold control.
    #[must_use]
    pub const fn bounds(&self) -> CriterionBounds {
        let (min, max, step) = match self {
            Self::PeMax => (0.0, 50.0, 0.5),
            Self::PbMax => (0.0, 10.0, 0.1),
            Self::PePbMax => (0.0, 50.0, 0.5),
            Self::DebtToEquityMax => (0.0, 2.0, 0.1),
            Self::CurrentRatioMin => (0.0, 5.0, 0.1),
            Self::DividendYieldMin => (0.0, 10.0, 0.1),
            Self::EpsMin => (-10.0, 50.0, 0.1),
            Self::MarketCapMin => (0.0, 10_000.0, 50.0),
        };
        CriterionBounds { min, max, step }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Sparse set of filter thresholds in user units.
///
/// A `None` field imposes no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Maximum trailing P/E.
    #[serde(default)]
    pub pe_max: Option<f64>,
    /// Maximum P/B.
    #[serde(default)]
    pub pb_max: Option<f64>,
    /// Maximum P/E × P/B.
    #[serde(default)]
    pub pe_pb_max: Option<f64>,
    /// Maximum debt/equity.
    #[serde(default)]
    pub debt_to_equity_max: Option<f64>,
    /// Minimum current ratio.
    #[serde(default)]
    pub current_ratio_min: Option<f64>,
    /// Minimum dividend yield in percent (2.0 = 2%).
    #[serde(default)]
    pub dividend_yield_min: Option<f64>,
    /// Minimum EPS.
    #[serde(default)]
    pub eps_min: Option<f64>,
    /// Minimum market capitalization in millions.
    #[serde(default)]
    pub market_cap_min: Option<f64>,
}

impl FilterCriteria {
    /// Criteria with no thresholds set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pe_max: None,
            pb_max: None,
            pe_pb_max: None,
            debt_to_equity_max: None,
            current_ratio_min: None,
            dividend_yield_min: None,
            eps_min: None,
            market_cap_min: None,
        }
    }

    /// Benjamin Graham's classic thresholds in user units.
    #[must_use]
    pub const fn graham() -> Self {
        Self {
            pe_max: Some(15.0),
            pb_max: Some(1.5),
            pe_pb_max: Some(22.5),
            debt_to_equity_max: Some(0.5),
            current_ratio_min: Some(1.5),
            dividend_yield_min: Some(2.0),
            eps_min: Some(0.0),
            market_cap_min: Some(500.0),
        }
    }

    /// Value of a threshold in user units.
    #[must_use]
    pub const fn get(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::PeMax => self.pe_max,
            Criterion::PbMax => self.pb_max,
            Criterion::PePbMax => self.pe_pb_max,
            Criterion::DebtToEquityMax => self.debt_to_equity_max,
            Criterion::CurrentRatioMin => self.current_ratio_min,
            Criterion::DividendYieldMin => self.dividend_yield_min,
            Criterion::EpsMin => self.eps_min,
            Criterion::MarketCapMin => self.market_cap_min,
        }
    }

    /// Set or clear a threshold.
    #[must_use]
    pub const fn with(mut self, criterion: Criterion, value: Option<f64>) -> Self {
        match criterion {
            Criterion::PeMax => self.pe_max = value,
            Criterion::PbMax => self.pb_max = value,
            Criterion::PePbMax => self.pe_pb_max = value,
            Criterion::DebtToEquityMax => self.debt_to_equity_max = value,
            Criterion::CurrentRatioMin => self.current_ratio_min = value,
            Criterion::DividendYieldMin => self.dividend_yield_min = value,
            Criterion::EpsMin => self.eps_min = value,
            Criterion::MarketCapMin => self.market_cap_min = value,
        }
        self
    }

    /// Threshold converted to table units.
    #[must_use]
    pub fn threshold(&self, criterion: Criterion) -> Option<f64> {
        self.get(criterion).map(|v| criterion.to_table_units(v))
    }

    /// Thresholds that are set, in canonical order.
    pub fn active(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|v| (c, v)))
    }

    /// Whether no threshold is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Overlay the thresholds set in `other` on top of `self`.
    #[must_use]
    pub fn merge(self, other: &Self) -> Self {
        other.active().fold(self, |acc, (c, v)| acc.with(c, Some(v)))
    }

    /// Check every set threshold is a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::InvalidCriteria`] naming the first bad
    /// threshold.
    pub fn validate(&self) -> Result<()> {
        match self.active().find(|(_, v)| !v.is_finite()) {
            Some((c, v)) => Err(ScreenerError::InvalidCriteria(format!("{c} = {v}"))),
            None => Ok(()),
        }
    }
}
