// src/handlers/warnings.rs
use std::sync::Arc;

use log::info;
use warp::reply::Json;
use warp::Rejection;

use super::error::reject_with;
use crate::context::AppContext;
use crate::models::{FinancialReport, ReportRow};
use crate::services::warnings::evaluate_warnings;

pub async fn post_warnings(rows: Vec<ReportRow>, ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Handling warning evaluation for {} report rows", rows.len());

    let report = FinancialReport { rows };
    let flags = evaluate_warnings(&report, &ctx.config.thresholds)
        .map_err(|e| reject_with("Failed to evaluate warning rules", e))?;

    info!("Evaluation raised {} flags", flags.len());
    Ok(warp::reply::json(&flags))
}
