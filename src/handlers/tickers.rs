// src/handlers/tickers.rs
use std::sync::Arc;

use log::info;
use warp::reply::Json;
use warp::Rejection;

use super::error::reject_with;
use crate::context::AppContext;

pub async fn get_tickers(ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Handling request to list B3 tickers");

    let tickers = ctx
        .tickers
        .fetch_ticker_list()
        .await
        .map_err(|e| reject_with("Failed to scrape ticker list", e))?;

    info!("Returning {} tickers", tickers.len());
    Ok(warp::reply::json(&tickers))
}
