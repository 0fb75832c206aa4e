// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::context::AppContext;
use crate::handlers::error::ApiError;
use crate::handlers::{
    prices::get_prices, report::get_report, tickers::get_tickers, valuation::get_valuation,
    valuation::ValuationQuery, warnings::post_warnings,
};

// Add recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Request body does not match the report row schema".to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "discount_rate and margin_rate query parameters are required".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let ctx_filter = warp::any().map(move || ctx.clone());

    let tickers_route = warp::path!("api" / "v1" / "tickers")
        .and(warp::get())
        .and(ctx_filter.clone())
        .and_then(get_tickers);

    let report_route = warp::path!("api" / "v1" / "report" / String)
        .and(warp::get())
        .and(ctx_filter.clone())
        .and_then(get_report);

    let warnings_route = warp::path!("api" / "v1" / "warnings")
        .and(warp::post())
        .and(warp::body::json())
        .and(ctx_filter.clone())
        .and_then(post_warnings);

    let valuation_route = warp::path!("api" / "v1" / "valuation" / String)
        .and(warp::get())
        .and(warp::query::<ValuationQuery>())
        .and(ctx_filter.clone())
        .and_then(get_valuation);

    let prices_route = warp::path!("api" / "v1" / "prices" / String)
        .and(warp::get())
        .and(ctx_filter.clone())
        .and_then(get_prices);

    info!("All routes configured successfully.");

    tickers_route
        .or(report_route)
        .or(warnings_route)
        .or(valuation_route)
        .or(prices_route)
        .recover(handle_rejection)
}
