use b3_value_dashboard::config::AppConfig;
use b3_value_dashboard::models::DisplayRow;
use b3_value_dashboard::services::report::build_report;
use b3_value_dashboard::services::sources::StatementSource;
use b3_value_dashboard::services::statements::ReutersStatements;
use dotenv::dotenv;
use env_logger;
use log::{error, info};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let ticker = env::args().nth(1).unwrap_or_else(|| "PETR4.SA".to_string());
    info!("Testing financial report scraping for {}...", ticker);

    let config = AppConfig::from_env()?;
    let source = ReutersStatements::new(&config)?;

    let (samples, years) = match source.fetch_financial_rows(&ticker).await {
        Ok(scraped) => scraped,
        Err(e) => {
            error!("ERROR: Failed to scrape statements: {}", e);
            return Err(e.into());
        }
    };
    info!("Scraped {} cells over {} fiscal years", samples.len(), years.len());

    match build_report(&samples, &years, config.lookback_years) {
        Ok(report) => {
            info!("SUCCESS: normalized {} rows", report.rows.len());
            for row in &report.rows {
                info!("  {:?}", DisplayRow::from(row));
            }
        }
        Err(e) => {
            error!("ERROR: Failed to normalize report: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
