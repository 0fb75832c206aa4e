// src/models.rs
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

/// One scraped statement cell: the metric label and the value coerced from
/// its display text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetricSample {
    pub metric: String,
    pub value: f64,
}

impl RawMetricSample {
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        RawMetricSample {
            metric: metric.into(),
            value,
        }
    }
}

/// Maps a statement table column to the calendar year parsed from its date
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalYearColumn {
    pub column: usize,
    pub year: i32,
}

/// One fiscal year of the normalized report. Raw numbers are the source of
/// truth; `DisplayRow` carries the formatted projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub year: i32,
    pub diluted_normalized_eps: f64,
    /// Fractional change vs the prior (older) year, 0 for the earliest year.
    pub eps_growth: f64,
    pub net_income: f64,
    pub shareholders_equity: f64,
    pub roa: f64,
    pub total_long_term_debt: f64,
    /// Renamed Net Income Before Taxes, matching the published statement.
    pub ebit: f64,
    pub roe: f64,
}

/// Normalized financial report, one row per fiscal year, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub rows: Vec<ReportRow>,
}

impl FinancialReport {
    /// Most recent fiscal year.
    pub fn latest(&self) -> Option<&ReportRow> {
        self.rows.first()
    }

    /// Earliest fiscal year in the lookback window.
    pub fn earliest(&self) -> Option<&ReportRow> {
        self.rows.last()
    }

    /// Rows in chronological order (oldest first), as the growth math needs.
    pub fn chronological(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().rev()
    }
}

/// Presentation projection of a `ReportRow`. The keys match the column ids
/// the dashboard table binds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Diluted Normalized EPS")]
    pub diluted_normalized_eps: String,
    #[serde(rename = "EPS Growth")]
    pub eps_growth: String,
    #[serde(rename = "Net Income")]
    pub net_income: String,
    #[serde(rename = "Shareholders Equity")]
    pub shareholders_equity: String,
    #[serde(rename = "ROA")]
    pub roa: String,
    #[serde(rename = "Total Long Term Debt")]
    pub total_long_term_debt: String,
    #[serde(rename = "EBIT")]
    pub ebit: String,
    #[serde(rename = "ROE")]
    pub roe: String,
}

impl From<&ReportRow> for DisplayRow {
    fn from(row: &ReportRow) -> Self {
        DisplayRow {
            year: row.year,
            diluted_normalized_eps: format_fixed(row.diluted_normalized_eps),
            eps_growth: format_percent(row.eps_growth),
            net_income: format_amount(row.net_income),
            shareholders_equity: format_amount(row.shareholders_equity),
            roa: format_fixed(row.roa),
            total_long_term_debt: format_amount(row.total_long_term_debt),
            ebit: format_amount(row.ebit),
            roe: format_fixed(row.roe),
        }
    }
}

/// Ratio fields: two decimal places.
pub fn format_fixed(value: f64) -> String {
    format!("{:.2}", value)
}

/// Growth fields: percentage with two decimal places, e.g. "12.34%".
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Money fields: thousands-separated with two decimal places.
pub fn format_amount(value: f64) -> String {
    let raw = format!("{:.2}", value);
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// One flagged concern from the rule evaluation, regenerated per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningFlag {
    pub reason: String,
}

impl WarningFlag {
    pub fn new(reason: impl Into<String>) -> Self {
        WarningFlag {
            reason: reason.into(),
        }
    }
}

/// Binary recommendation; the wire labels are the Portuguese strings the
/// dashboard displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "COMPRAR")]
    Buy,
    #[serde(rename = "VENDER")]
    Sell,
}

/// Projected intrinsic value for a ticker, recomputed on every request with
/// the current slider inputs.
///
/// `last_eps` is the EPS of the earliest report year (the growth anchor);
/// `last_share_price` is the most recent close. The field names are kept for
/// the dashboard contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationEstimate {
    pub annual_growth_rate: f64,
    pub last_eps: f64,
    pub future_eps: f64,
    pub pe_ratio: f64,
    #[serde(rename = "FV")]
    pub future_value: f64,
    #[serde(rename = "PV")]
    pub present_value: f64,
    pub margin_price: f64,
    pub last_share_price: f64,
    pub decision: Decision,
}

/// Dropdown entry for the ticker selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub value: String,
    pub label: String,
}

/// One daily price observation for the chart and the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
