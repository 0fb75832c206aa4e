// src/services/tickers.rs
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::TickerInfo;
use crate::services::sources::TickerSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Scrapes the Yahoo Finanças B3 industry pages for the ticker dropdown.
pub struct YahooIndustryTickers {
    client: Client,
    base_url: String,
    industries: Vec<String>,
}

impl YahooIndustryTickers {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(YahooIndustryTickers {
            client,
            base_url: config.industry_list_url.clone(),
            industries: config.industries.clone(),
        })
    }
}

#[async_trait]
impl TickerSource for YahooIndustryTickers {
    async fn fetch_ticker_list(&self) -> Result<Vec<TickerInfo>, AnalysisError> {
        let mut tickers = Vec::new();

        for industry in &self.industries {
            let url = format!("{}{}", self.base_url, industry);
            info!("Fetching industry page: {}", url);

            let body = self.client.get(&url).send().await?.text().await?;
            let found = parse_industry_page(&body);
            if found.is_empty() {
                warn!("No tickers found on industry page {}", industry);
            }
            tickers.extend(found);
        }

        if tickers.is_empty() {
            return Err(AnalysisError::DataSource(
                "no tickers scraped from any industry page".to_string(),
            ));
        }

        info!("Scraped {} tickers across {} industries", tickers.len(), self.industries.len());
        Ok(tickers)
    }
}

/// Pull `(symbol, title)` pairs out of an industry listing page. Rows where
/// the symbol equals the title are index entries, not stocks, and are
/// skipped.
pub fn parse_industry_page(body: &str) -> Vec<TickerInfo> {
    let anchor_selector = Selector::parse("tbody a").unwrap();
    let document = Html::parse_document(body);

    let mut tickers = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let symbol = anchor.value().attr("data-symbol");
        let title = anchor.value().attr("title");
        if let (Some(symbol), Some(title)) = (symbol, title) {
            if symbol != title {
                tickers.push(TickerInfo {
                    value: symbol.to_string(),
                    label: format!("{} | {}", symbol, title),
                });
            }
        }
    }
    tickers
}
