// src/handlers/prices.rs
use std::sync::Arc;

use log::info;
use warp::reply::Json;
use warp::Rejection;

use super::error::reject_with;
use crate::context::AppContext;

pub async fn get_prices(ticker: String, ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Handling price history request for {}", ticker);

    let bars = ctx
        .prices
        .fetch_price_history(&ticker)
        .await
        .map_err(|e| reject_with("Failed to fetch price history", e))?;

    info!("Returning {} daily bars for {}", bars.len(), ticker);
    Ok(warp::reply::json(&bars))
}
