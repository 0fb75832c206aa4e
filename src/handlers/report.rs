// src/handlers/report.rs
use std::sync::Arc;

use log::info;
use serde::Serialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::reject_with;
use crate::context::AppContext;
use crate::models::{DisplayRow, ReportRow};
use crate::services::report::build_report;

/// Raw rows are the source of truth; `table` carries the formatted strings
/// the dashboard table binds to.
#[derive(Serialize)]
struct ReportResponse {
    rows: Vec<ReportRow>,
    table: Vec<DisplayRow>,
}

pub async fn get_report(ticker: String, ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Handling financial report request for {}", ticker);

    let (samples, years) = ctx
        .statements
        .fetch_financial_rows(&ticker)
        .await
        .map_err(|e| reject_with("Failed to scrape financial statements", e))?;

    let report = build_report(&samples, &years, ctx.config.lookback_years)
        .map_err(|e| reject_with("Failed to normalize financial report", e))?;

    let table = report.rows.iter().map(DisplayRow::from).collect();
    info!("Normalized {} fiscal years for {}", report.rows.len(), ticker);
    Ok(warp::reply::json(&ReportResponse {
        rows: report.rows,
        table,
    }))
}
