// src/services/report.rs
use std::collections::HashMap;

use crate::error::AnalysisError;
use crate::models::{FinancialReport, FiscalYearColumn, RawMetricSample, ReportRow};
use crate::services::statements::{
    DILUTED_EPS, LIABILITIES_AND_EQUITY, LONG_TERM_DEBT, NET_INCOME, PRETAX_INCOME, TOTAL_ASSETS,
    TOTAL_LIABILITIES,
};

/// Assemble the scraped samples into one row per fiscal year and derive the
/// growth and profitability fields. Samples arrive in column order (most
/// recent year first), so the resulting rows are newest first.
pub fn build_report(
    samples: &[RawMetricSample],
    years: &[FiscalYearColumn],
    lookback_years: usize,
) -> Result<FinancialReport, AnalysisError> {
    if years.len() != lookback_years {
        return Err(AnalysisError::MalformedReport(format!(
            "expected {} fiscal year columns, found {}",
            lookback_years,
            years.len()
        )));
    }

    let mut grouped: HashMap<&str, Vec<f64>> = HashMap::new();
    for sample in samples {
        grouped
            .entry(sample.metric.as_str())
            .or_default()
            .push(sample.value);
    }

    let eps = required_metric(&grouped, DILUTED_EPS, lookback_years)?;
    let net_income = required_metric(&grouped, NET_INCOME, lookback_years)?;
    let pretax_income = required_metric(&grouped, PRETAX_INCOME, lookback_years)?;
    let total_assets = required_metric(&grouped, TOTAL_ASSETS, lookback_years)?;
    let long_term_debt = required_metric(&grouped, LONG_TERM_DEBT, lookback_years)?;
    let total_liabilities = required_metric(&grouped, TOTAL_LIABILITIES, lookback_years)?;
    let liabilities_and_equity = required_metric(&grouped, LIABILITIES_AND_EQUITY, lookback_years)?;

    let mut rows = Vec::with_capacity(lookback_years);
    for (i, column) in years.iter().enumerate() {
        let equity = liabilities_and_equity[i] - total_liabilities[i];
        if equity == 0.0 {
            return Err(AnalysisError::MalformedReport(format!(
                "zero shareholders equity in {}; ROE is undefined",
                column.year
            )));
        }
        if total_assets[i] == 0.0 {
            return Err(AnalysisError::MalformedReport(format!(
                "zero total assets in {}; ROA is undefined",
                column.year
            )));
        }
        rows.push(ReportRow {
            year: column.year,
            diluted_normalized_eps: eps[i],
            eps_growth: 0.0, // filled in below once every year is present
            net_income: net_income[i],
            shareholders_equity: equity,
            roa: net_income[i] / total_assets[i],
            total_long_term_debt: long_term_debt[i],
            // EBIT is a straight rename of Net Income Before Taxes as
            // published; no interest or tax add-back is applied.
            ebit: pretax_income[i],
            roe: net_income[i] / equity,
        });
    }

    // Growth compares against the chronologically prior year; rows are
    // newest first, so the prior year sits at the next index. The earliest
    // year has no prior and keeps growth 0.
    let count = rows.len();
    for i in 0..count.saturating_sub(1) {
        let prior = rows[i + 1].diluted_normalized_eps;
        if prior == 0.0 {
            return Err(AnalysisError::MalformedReport(format!(
                "zero EPS in {} makes growth for {} undefined",
                rows[i + 1].year,
                rows[i].year
            )));
        }
        rows[i].eps_growth = (rows[i].diluted_normalized_eps - prior) / prior;
    }

    Ok(FinancialReport { rows })
}

fn required_metric<'a>(
    grouped: &'a HashMap<&str, Vec<f64>>,
    name: &str,
    lookback_years: usize,
) -> Result<&'a [f64], AnalysisError> {
    let values = grouped.get(name).ok_or_else(|| {
        AnalysisError::MalformedReport(format!(
            "metric '{}' is missing from the scraped statements",
            name
        ))
    })?;
    if values.len() != lookback_years {
        return Err(AnalysisError::MalformedReport(format!(
            "metric '{}' has {} values for {} fiscal years",
            name,
            values.len(),
            lookback_years
        )));
    }
    Ok(values)
}
