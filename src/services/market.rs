// src/services/market.rs
use async_trait::async_trait;
use chrono::{DateTime, Datelike};
use log::info;
use reqwest::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::PriceBar;
use crate::services::sources::PriceSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Daily price history from the Yahoo Finance v8 chart endpoint.
pub struct YahooChart {
    client: Client,
    base_url: String,
    lookback_years: usize,
}

impl YahooChart {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(YahooChart {
            client,
            base_url: config.chart_url.clone(),
            lookback_years: config.lookback_years,
        })
    }
}

#[async_trait]
impl PriceSource for YahooChart {
    async fn fetch_price_history(&self, ticker: &str) -> Result<Vec<PriceBar>, AnalysisError> {
        let url = format!(
            "{}/{}?interval=1d&range={}y",
            self.base_url, ticker, self.lookback_years
        );
        info!("Fetching price history: {}", url);

        let response: ChartResponse = self.client.get(&url).send().await?.json().await?;
        let bars = bars_from_response(ticker, response)?;
        info!("Fetched {} daily bars for {}", bars.len(), ticker);
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize, Default)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

/// Flatten the chart payload into daily bars, oldest first. Days where Yahoo
/// reports no close (halts, nulls) are dropped.
fn bars_from_response(
    ticker: &str,
    response: ChartResponse,
) -> Result<Vec<PriceBar>, AnalysisError> {
    if let Some(error) = response.chart.error {
        return Err(AnalysisError::DataSource(format!(
            "chart endpoint rejected {}: {} ({})",
            ticker, error.description, error.code
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| {
            AnalysisError::DataSource(format!("chart endpoint returned no series for {}", ticker))
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let close = match closes.get(i).copied().flatten() {
            Some(close) => close,
            None => continue,
        };
        let date = match DateTime::from_timestamp(*ts, 0) {
            Some(datetime) => datetime.date_naive(),
            None => continue,
        };
        bars.push(PriceBar {
            date,
            open: opens.get(i).copied().flatten().unwrap_or(close),
            high: highs.get(i).copied().flatten().unwrap_or(close),
            low: lows.get(i).copied().flatten().unwrap_or(close),
            close,
        });
    }

    bars.sort_by_key(|bar| bar.date);
    Ok(bars)
}

/// First available close for each calendar year, oldest year first. Expects
/// bars sorted ascending by date, as `fetch_price_history` returns them.
pub fn first_close_per_year(bars: &[PriceBar]) -> Vec<(i32, f64)> {
    let mut closes: Vec<(i32, f64)> = Vec::new();
    for bar in bars {
        let year = bar.date.year();
        if closes.last().map(|(y, _)| *y) != Some(year) {
            closes.push((year, bar.close));
        }
    }
    closes
}

/// Most recent close in the series.
pub fn last_close(bars: &[PriceBar]) -> Option<f64> {
    bars.last().map(|bar| bar.close)
}
