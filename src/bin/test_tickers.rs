use b3_value_dashboard::config::AppConfig;
use b3_value_dashboard::services::sources::TickerSource;
use b3_value_dashboard::services::tickers::YahooIndustryTickers;
use dotenv::dotenv;
use env_logger;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Testing B3 ticker list scraping...");

    let config = AppConfig::from_env()?;
    let source = YahooIndustryTickers::new(&config)?;

    match source.fetch_ticker_list().await {
        Ok(tickers) => {
            info!("SUCCESS: scraped {} tickers", tickers.len());
            for ticker in tickers.iter().take(10) {
                info!("  {}", ticker.label);
            }
        }
        Err(e) => {
            error!("ERROR: Failed to scrape ticker list: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
