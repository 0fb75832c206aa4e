// src/services/sources.rs
use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::models::{FiscalYearColumn, PriceBar, RawMetricSample, TickerInfo};

/// Supplies the entries for the ticker dropdown.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn fetch_ticker_list(&self) -> Result<Vec<TickerInfo>, AnalysisError>;
}

/// Supplies the raw statement rows plus the fiscal-year column mapping for a
/// ticker. Values are already numeric, years are 4-digit integers.
#[async_trait]
pub trait StatementSource: Send + Sync {
    async fn fetch_financial_rows(
        &self,
        ticker: &str,
    ) -> Result<(Vec<RawMetricSample>, Vec<FiscalYearColumn>), AnalysisError>;
}

/// Supplies the daily price history for a ticker over the lookback window,
/// oldest observation first.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price_history(&self, ticker: &str) -> Result<Vec<PriceBar>, AnalysisError>;
}
