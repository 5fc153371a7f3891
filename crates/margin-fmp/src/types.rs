//! Data types for FMP API responses.
//!
//! Every numeric field is optional: FMP omits or nulls metrics it does not
//! track for a symbol, and those gaps must stay visible downstream.

use serde::{Deserialize, Serialize};

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Trailing EPS, when the endpoint reports it.
    #[serde(default)]
    pub eps: Option<f64>,
    /// Trailing P/E, when the endpoint reports it.
    #[serde(default)]
    pub pe: Option<f64>,
    /// Exchange the quote comes from.
    #[serde(default)]
    pub exchange: Option<String>,
}

/// Trailing-twelve-month financial ratios from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatiosTtm {
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Price to earnings.
    #[serde(rename = "priceToEarningsRatioTTM", default)]
    pub price_to_earnings: Option<f64>,
    /// Price to book.
    #[serde(rename = "priceToBookRatioTTM", default)]
    pub price_to_book: Option<f64>,
    /// Dividend yield as a fraction.
    #[serde(rename = "dividendYieldTTM", default)]
    pub dividend_yield: Option<f64>,
    /// Debt to equity.
    #[serde(rename = "debtToEquityRatioTTM", default)]
    pub debt_to_equity: Option<f64>,
    /// Current ratio.
    #[serde(rename = "currentRatioTTM", default)]
    pub current_ratio: Option<f64>,
    /// Net income per share.
    #[serde(rename = "netIncomePerShareTTM", default)]
    pub net_income_per_share: Option<f64>,
}

/// The two snapshots a fundamentals record is assembled from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Latest quote, if FMP has one.
    pub quote: Option<Quote>,
    /// Latest TTM ratios, if FMP has them.
    pub ratios: Option<RatiosTtm>,
}

impl Snapshot {
    /// Company name from the quote, or empty.
    #[must_use]
    pub fn name(&self) -> String {
        self.quote
            .as_ref()
            .and_then(|q| q.name.clone())
            .unwrap_or_default()
    }

    /// Current price.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.quote.as_ref().and_then(|q| q.price)
    }

    /// Market cap.
    #[must_use]
    pub fn market_cap(&self) -> Option<f64> {
        self.quote.as_ref().and_then(|q| q.market_cap)
    }

    /// Trailing P/E, preferring the ratios endpoint.
    #[must_use]
    pub fn pe(&self) -> Option<f64> {
        self.ratios
            .as_ref()
            .and_then(|r| r.price_to_earnings)
            .or_else(|| self.quote.as_ref().and_then(|q| q.pe))
    }

    /// Trailing EPS, preferring the quote.
    #[must_use]
    pub fn eps(&self) -> Option<f64> {
        self.quote
            .as_ref()
            .and_then(|q| q.eps)
            .or_else(|| self.ratios.as_ref().and_then(|r| r.net_income_per_share))
    }

    /// Price to book.
    #[must_use]
    pub fn pb(&self) -> Option<f64> {
        self.ratios.as_ref().and_then(|r| r.price_to_book)
    }

    /// Dividend yield as a fraction.
    #[must_use]
    pub fn dividend_yield(&self) -> Option<f64> {
        self.ratios.as_ref().and_then(|r| r.dividend_yield)
    }

    /// Debt to equity.
    #[must_use]
    pub fn debt_to_equity(&self) -> Option<f64> {
        self.ratios.as_ref().and_then(|r| r.debt_to_equity)
    }

    /// Current ratio.
    #[must_use]
    pub fn current_ratio(&self) -> Option<f64> {
        self.ratios.as_ref().and_then(|r| r.current_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote_with_nulls() {
        let json = r#"[{"symbol":"BARC.L","name":"Barclays PLC","price":2.31,"marketCap":null,"exchange":"LSE"}]"#;
        let quotes: Vec<Quote> = serde_json::from_str(json).unwrap();
        assert_eq!(quotes[0].symbol, "BARC.L");
        assert_eq!(quotes[0].price, Some(2.31));
        assert!(quotes[0].market_cap.is_none());
        assert!(quotes[0].eps.is_none());
    }

    #[test]
    fn test_parse_ratios_ttm() {
        let json = r#"[{"symbol":"KO","priceToEarningsRatioTTM":24.1,"priceToBookRatioTTM":10.2,
            "dividendYieldTTM":0.029,"debtToEquityRatioTTM":1.6,"currentRatioTTM":1.1,
            "netIncomePerShareTTM":2.47,"grossProfitMarginTTM":0.6}]"#;
        let ratios: Vec<RatiosTtm> = serde_json::from_str(json).unwrap();
        assert_eq!(ratios[0].price_to_book, Some(10.2));
        assert_eq!(ratios[0].dividend_yield, Some(0.029));
        assert_eq!(ratios[0].net_income_per_share, Some(2.47));
    }

    #[test]
    fn test_snapshot_prefers_sources() {
        let snapshot = Snapshot {
            quote: Some(Quote {
                symbol: "KO".to_string(),
                pe: Some(30.0),
                eps: Some(2.5),
                ..Quote::default()
            }),
            ratios: Some(RatiosTtm {
                price_to_earnings: Some(24.0),
                net_income_per_share: Some(2.47),
                ..RatiosTtm::default()
            }),
        };
        assert_eq!(snapshot.pe(), Some(24.0));
        assert_eq!(snapshot.eps(), Some(2.5));
        assert_eq!(snapshot.name(), "");
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.price().is_none());
        assert!(snapshot.pe().is_none());
        assert!(snapshot.eps().is_none());
    }
}
