use b3_value_dashboard::config::AppConfig;
use b3_value_dashboard::services::market::YahooChart;
use b3_value_dashboard::services::report::build_report;
use b3_value_dashboard::services::sources::{PriceSource, StatementSource};
use b3_value_dashboard::services::statements::ReutersStatements;
use b3_value_dashboard::services::valuation;
use b3_value_dashboard::services::warnings::evaluate_warnings;
use dotenv::dotenv;
use env_logger;
use log::{error, info};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let ticker = env::args().nth(1).unwrap_or_else(|| "PETR4.SA".to_string());
    let discount_rate = 0.15;
    let margin_rate = 0.15;
    info!("Testing the full valuation chain for {}...", ticker);

    let config = AppConfig::from_env()?;
    let statements = ReutersStatements::new(&config)?;
    let prices = YahooChart::new(&config)?;

    let (samples, years) = statements.fetch_financial_rows(&ticker).await?;
    let report = build_report(&samples, &years, config.lookback_years)?;
    info!("Normalized {} fiscal years", report.rows.len());

    let flags = evaluate_warnings(&report, &config.thresholds)?;
    for flag in &flags {
        info!("WARNING: {}", flag.reason);
    }

    let bars = prices.fetch_price_history(&ticker).await?;
    info!("Fetched {} daily bars", bars.len());

    match valuation::estimate(&report, &bars, discount_rate, margin_rate, &config) {
        Ok(estimate) => {
            info!("SUCCESS: {:?}", estimate);
        }
        Err(e) => {
            error!("ERROR: Failed to compute valuation: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
