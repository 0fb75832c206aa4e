// src/context.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::services::market::YahooChart;
use crate::services::sources::{PriceSource, StatementSource, TickerSource};
use crate::services::statements::ReutersStatements;
use crate::services::tickers::YahooIndustryTickers;

/// Shared per-process state handed to every handler: the configuration plus
/// the three external collaborators behind their capability traits, so tests
/// can swap in fixture sources.
pub struct AppContext {
    pub config: AppConfig,
    pub tickers: Arc<dyn TickerSource>,
    pub statements: Arc<dyn StatementSource>,
    pub prices: Arc<dyn PriceSource>,
}

impl AppContext {
    /// Context wired to the live scraping collaborators.
    pub fn live(config: AppConfig) -> Result<Self, AnalysisError> {
        let tickers = Arc::new(YahooIndustryTickers::new(&config)?);
        let statements = Arc::new(ReutersStatements::new(&config)?);
        let prices = Arc::new(YahooChart::new(&config)?);
        Ok(AppContext {
            config,
            tickers,
            statements,
            prices,
        })
    }

    /// Context with explicit sources, used by tests with fixture data.
    pub fn with_sources(
        config: AppConfig,
        tickers: Arc<dyn TickerSource>,
        statements: Arc<dyn StatementSource>,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        AppContext {
            config,
            tickers,
            statements,
            prices,
        }
    }
}
