// src/services/statements.rs
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::{FiscalYearColumn, RawMetricSample};
use crate::services::sources::StatementSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const NET_INCOME: &str = "Net Income";
pub const INTEREST_EXPENSE: &str = "Interest Exp.(Inc.),Net-Operating, Total";
pub const DILUTED_EPS: &str = "Diluted Normalized EPS";
pub const PRETAX_INCOME: &str = "Net Income Before Taxes";
pub const TOTAL_ASSETS: &str = "Total Assets";
pub const LONG_TERM_DEBT: &str = "Total Long Term Debt";
pub const TOTAL_LIABILITIES: &str = "Total Liabilities";
pub const LIABILITIES_AND_EQUITY: &str = "Total Liabilities & Shareholders' Equity";

/// Rows pulled from the annual income statement page.
pub const INCOME_STATEMENT_METRICS: &[&str] =
    &[NET_INCOME, INTEREST_EXPENSE, DILUTED_EPS, PRETAX_INCOME];

/// Rows pulled from the annual balance sheet page.
pub const BALANCE_SHEET_METRICS: &[&str] = &[
    TOTAL_ASSETS,
    LONG_TERM_DEBT,
    TOTAL_LIABILITIES,
    LIABILITIES_AND_EQUITY,
];

/// Scrapes the Reuters annual statement pages for a ticker.
pub struct ReutersStatements {
    client: Client,
    base_url: String,
    lookback_years: usize,
}

impl ReutersStatements {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(ReutersStatements {
            client,
            base_url: config.statements_url.clone(),
            lookback_years: config.lookback_years,
        })
    }

    async fn get_page(&self, url: &str) -> Result<String, AnalysisError> {
        info!("Fetching statement page: {}", url);
        let body = self.client.get(url).send().await?.text().await?;
        Ok(body)
    }
}

#[async_trait]
impl StatementSource for ReutersStatements {
    async fn fetch_financial_rows(
        &self,
        ticker: &str,
    ) -> Result<(Vec<RawMetricSample>, Vec<FiscalYearColumn>), AnalysisError> {
        let income_url = format!(
            "{}/{}/financials/income-statement-annual",
            self.base_url, ticker
        );
        let balance_url = format!(
            "{}/{}/financials/balance-sheet-annual",
            self.base_url, ticker
        );

        let income_body = self.get_page(&income_url).await?;
        let balance_body = self.get_page(&balance_url).await?;

        // The fiscal-year headers come from the income statement; both pages
        // publish the same columns.
        let years = parse_year_columns(&income_body)?;
        if years.len() != self.lookback_years {
            warn!(
                "Statement header for {} has {} year columns, expected {}",
                ticker,
                years.len(),
                self.lookback_years
            );
        }

        let mut samples = scrape_metric_rows(&income_body, INCOME_STATEMENT_METRICS);
        samples.extend(scrape_metric_rows(&balance_body, BALANCE_SHEET_METRICS));

        if samples.is_empty() {
            return Err(AnalysisError::DataSource(format!(
                "no statement rows found for {}",
                ticker
            )));
        }

        info!(
            "Scraped {} statement cells across {} fiscal years for {}",
            samples.len(),
            years.len(),
            ticker
        );
        Ok((samples, years))
    }
}

/// Parse the statement's column headers into calendar years. Headers are
/// dates like `31-Dec-20`, sometimes wrapped in extra whitespace or markup
/// text.
pub fn parse_year_columns(body: &str) -> Result<Vec<FiscalYearColumn>, AnalysisError> {
    let header_selector = Selector::parse("thead th time").unwrap();
    let date_re = Regex::new(r"(\d{1,2}-[A-Za-z]{3}-\d{2})").unwrap();
    let document = Html::parse_document(body);

    let mut years = Vec::new();
    for (column, header) in document.select(&header_selector).enumerate() {
        let text = header.text().collect::<String>();
        let captured = date_re
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                AnalysisError::MalformedReport(format!(
                    "unrecognized fiscal year header '{}'",
                    text.trim()
                ))
            })?;
        let date = NaiveDate::parse_from_str(&captured, "%d-%b-%y").map_err(|e| {
            AnalysisError::MalformedReport(format!(
                "fiscal year header '{}' is not a date: {}",
                captured, e
            ))
        })?;
        years.push(FiscalYearColumn {
            column,
            year: date.year(),
        });
    }

    if years.is_empty() {
        return Err(AnalysisError::MalformedReport(
            "statement page has no fiscal year headers".to_string(),
        ));
    }
    Ok(years)
}

/// Walk the statement table and collect one sample per cell for the wanted
/// metrics, in column order (most recent year first).
pub fn scrape_metric_rows(body: &str, wanted: &[&str]) -> Vec<RawMetricSample> {
    let row_selector = Selector::parse("tbody tr").unwrap();
    let name_selector = Selector::parse("th span").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let document = Html::parse_document(body);

    let mut samples = Vec::new();
    for row in document.select(&row_selector) {
        let name = match row.select(&name_selector).next() {
            Some(element) => element.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        if !wanted.contains(&name.as_str()) {
            continue;
        }
        for cell in row.select(&cell_selector) {
            let text = cell.text().collect::<String>();
            samples.push(RawMetricSample::new(name.clone(), coerce_cell(&text)));
        }
    }
    samples
}

/// Coerce a display cell to a number: thousands separators stripped,
/// parenthesized values negative, anything unparsable falls back to 0.
pub fn coerce_cell(text: &str) -> f64 {
    let cleaned = text.trim().replace(',', "");
    if let Ok(value) = cleaned.parse::<f64>() {
        return value;
    }
    if cleaned.starts_with('(') && cleaned.ends_with(')') {
        let inner = &cleaned[1..cleaned.len() - 1];
        if let Ok(value) = inner.parse::<f64>() {
            return -value;
        }
    }
    0.0
}
