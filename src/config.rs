// src/config.rs
use anyhow::{Context, Result};
use std::env;

/// Thresholds the warning rules compare against.
#[derive(Debug, Clone)]
pub struct WarningThresholds {
    /// Minimum acceptable mean ROE across the report years.
    pub roe_floor: f64,
    /// Minimum acceptable mean ROA across the report years.
    pub roa_floor: f64,
    /// Latest-year long-term debt above this multiple of net income is
    /// flagged as excessive leverage.
    pub debt_to_income_multiple: f64,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        WarningThresholds {
            roe_floor: 0.15,
            roa_floor: 0.07,
            debt_to_income_multiple: 5.0,
        }
    }
}

/// Process configuration. The scrape endpoints, industry list, and horizons
/// were baked constants in the original dashboard; they are explicit here so
/// tests can inject deterministic values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL for the Yahoo Finanças industry listing pages; the industry
    /// slug is appended.
    pub industry_list_url: String,
    /// B3 industry slugs scraped for the ticker dropdown.
    pub industries: Vec<String>,
    /// Base URL for the Reuters per-company financial statement pages.
    pub statements_url: String,
    /// Base URL for the Yahoo Finance v8 chart endpoint.
    pub chart_url: String,
    /// Fiscal years of statement history scraped and normalized.
    pub lookback_years: usize,
    /// Periods the estimator projects EPS and discounts the terminal value.
    pub projection_years: u32,
    pub thresholds: WarningThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            industry_list_url: "https://br.financas.yahoo.com/industries/".to_string(),
            industries: vec![
                "Energia-Petroleo-Gas".to_string(),
                "Industria-Financeira".to_string(),
                "Saude-Farmaceutica".to_string(),
                "Telecomunicacoes-Tecnologia".to_string(),
                "Industria-Alimenticia".to_string(),
                "Industria-Manufatureira".to_string(),
                "Servicos-diversos".to_string(),
                "Varejo".to_string(),
                "Construcao-Equipamentos".to_string(),
                "Bens-de-consumo".to_string(),
                "Industrias-em-geral".to_string(),
            ],
            statements_url: "https://www.reuters.com/companies".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            lookback_years: 5,
            projection_years: 10,
            thresholds: WarningThresholds::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with optional overrides from the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = AppConfig::default();

        if let Ok(url) = env::var("TICKER_LIST_URL") {
            config.industry_list_url = url;
        }
        if let Ok(url) = env::var("STATEMENTS_URL") {
            config.statements_url = url;
        }
        if let Ok(url) = env::var("CHART_URL") {
            config.chart_url = url;
        }
        if let Ok(years) = env::var("LOOKBACK_YEARS") {
            config.lookback_years = years
                .parse()
                .context("LOOKBACK_YEARS must be a whole number of years")?;
        }

        Ok(config)
    }
}
