use dotenv::dotenv;
use env_logger;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use b3_value_dashboard::config::AppConfig;
use b3_value_dashboard::context::AppContext;
use b3_value_dashboard::routes;
use b3_value_dashboard::BoxError;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    // Get port from the environment, default to 3030
    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });

    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let config = AppConfig::from_env()?;
    let ctx = Arc::new(AppContext::live(config)?);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    // Set up routes
    let api = routes::routes(ctx).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;

    Ok(())
}
