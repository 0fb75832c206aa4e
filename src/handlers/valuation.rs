// src/handlers/valuation.rs
use std::sync::Arc;

use log::info;
use serde::Deserialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::reject_with;
use crate::context::AppContext;
use crate::services::report::build_report;
use crate::services::valuation;

/// Slider inputs from the dashboard, each a fraction in [0, 1].
#[derive(Debug, Deserialize)]
pub struct ValuationQuery {
    pub discount_rate: f64,
    pub margin_rate: f64,
}

pub async fn get_valuation(
    ticker: String,
    query: ValuationQuery,
    ctx: Arc<AppContext>,
) -> Result<Json, Rejection> {
    info!(
        "Handling valuation request for {} (discount {}, margin {})",
        ticker, query.discount_rate, query.margin_rate
    );

    let (samples, years) = ctx
        .statements
        .fetch_financial_rows(&ticker)
        .await
        .map_err(|e| reject_with("Failed to scrape financial statements", e))?;

    let report = build_report(&samples, &years, ctx.config.lookback_years)
        .map_err(|e| reject_with("Failed to normalize financial report", e))?;

    let bars = ctx
        .prices
        .fetch_price_history(&ticker)
        .await
        .map_err(|e| reject_with("Failed to fetch price history", e))?;

    let estimate = valuation::estimate(
        &report,
        &bars,
        query.discount_rate,
        query.margin_rate,
        &ctx.config,
    )
    .map_err(|e| reject_with("Failed to compute valuation", e))?;

    info!(
        "Valuation for {}: margin price {} vs last close {}",
        ticker, estimate.margin_price, estimate.last_share_price
    );
    Ok(warp::reply::json(&estimate))
}
