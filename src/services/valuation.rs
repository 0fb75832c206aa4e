// src/services/valuation.rs
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::{Decision, FinancialReport, PriceBar, ValuationEstimate};
use crate::services::market;

/// Periodic rate that compounds `pv` to `fv` over `periods`, with `pv`
/// treated as the negative cash flow of the standard rate equation.
pub fn compound_rate(periods: u32, pv: f64, fv: f64) -> Result<f64, AnalysisError> {
    if periods == 0 {
        return Err(AnalysisError::InsufficientData(
            "cannot solve a growth rate over zero periods".to_string(),
        ));
    }
    if pv == 0.0 {
        return Err(AnalysisError::InsufficientData(
            "zero anchor EPS makes the growth rate undefined".to_string(),
        ));
    }
    let ratio = fv / pv;
    if ratio < 0.0 {
        return Err(AnalysisError::InsufficientData(format!(
            "EPS moved from {} to {}; no real rate compounds across a sign change",
            pv, fv
        )));
    }
    Ok(ratio.powf(1.0 / f64::from(periods)) - 1.0)
}

/// Value of `pv` compounded for `periods` at `rate`, no periodic payment.
pub fn future_value(rate: f64, periods: u32, pv: f64) -> f64 {
    pv * (1.0 + rate).powi(periods as i32)
}

/// Present value of the single future sum `fv` discounted over `periods`.
pub fn present_value(rate: f64, periods: u32, fv: f64) -> f64 {
    fv / (1.0 + rate).powi(periods as i32)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Project an intrinsic value for the ticker behind `report` and decide
/// between buying and selling.
///
/// The EPS of the earliest report year anchors the growth estimate and is
/// reported as `last_eps`; the decision compares the most recent close
/// against the margin price.
pub fn estimate(
    report: &FinancialReport,
    bars: &[PriceBar],
    discount_rate: f64,
    margin_rate: f64,
    config: &AppConfig,
) -> Result<ValuationEstimate, AnalysisError> {
    for (name, value) in [("discount_rate", discount_rate), ("margin_rate", margin_rate)] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(AnalysisError::Validation(format!(
                "{} must be between 0 and 1, got {}",
                name, value
            )));
        }
    }
    if report.rows.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "report has {} rows; growth estimation needs at least 2 fiscal years",
            report.rows.len()
        )));
    }
    let last_share_price = market::last_close(bars).ok_or_else(|| {
        AnalysisError::InsufficientData("price history is empty".to_string())
    })?;

    let (latest, earliest) = match (report.latest(), report.earliest()) {
        (Some(latest), Some(earliest)) => (latest, earliest),
        _ => {
            return Err(AnalysisError::InsufficientData(
                "report has no rows".to_string(),
            ))
        }
    };

    let pv_eps = earliest.diluted_normalized_eps;
    let fv_eps = latest.diluted_normalized_eps;
    let annual_growth_rate = compound_rate(config.lookback_years as u32, pv_eps, fv_eps)?;
    let future_eps = future_value(annual_growth_rate, config.projection_years, pv_eps).abs();

    // Conservative multiple: the lowest P/E seen across the lookback, using
    // each year's first available close against that year's EPS.
    let eps_by_year: HashMap<i32, f64> = report
        .rows
        .iter()
        .map(|row| (row.year, row.diluted_normalized_eps))
        .collect();
    let mut pe_ratio = f64::INFINITY;
    for (year, close) in market::first_close_per_year(bars) {
        if let Some(eps) = eps_by_year.get(&year) {
            if *eps != 0.0 {
                let pe = close / eps;
                if pe < pe_ratio {
                    pe_ratio = pe;
                }
            }
        }
    }
    if !pe_ratio.is_finite() {
        return Err(AnalysisError::InsufficientData(
            "no calendar year with both a close price and a nonzero EPS".to_string(),
        ));
    }

    let projected_value = future_eps * pe_ratio;
    let intrinsic_value = present_value(discount_rate, config.projection_years, projected_value).abs();

    // A non-positive terminal value would turn the margin into nonsense;
    // force the threshold to zero instead.
    let margin_price = if projected_value > 0.0 {
        intrinsic_value * (1.0 - margin_rate)
    } else {
        0.0
    };

    let decision = if last_share_price < margin_price {
        Decision::Buy
    } else {
        Decision::Sell
    };

    Ok(ValuationEstimate {
        annual_growth_rate: round2(annual_growth_rate),
        last_eps: round2(pv_eps),
        future_eps: round2(future_eps),
        pe_ratio: round2(pe_ratio),
        future_value: round2(projected_value),
        present_value: round2(intrinsic_value),
        margin_price: round2(margin_price),
        last_share_price: round2(last_share_price),
        decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportRow;
    use chrono::NaiveDate;

    fn eps_row(year: i32, eps: f64) -> ReportRow {
        ReportRow {
            year,
            diluted_normalized_eps: eps,
            eps_growth: 0.0,
            net_income: 100.0,
            shareholders_equity: 500.0,
            roa: 0.1,
            total_long_term_debt: 100.0,
            ebit: 120.0,
            roe: 0.2,
        }
    }

    fn bar(year: i32, month: u32, day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    /// EPS doubles from 1.0 to 2.0 across the window; yearly first closes
    /// put the minimum P/E at 8 (2021) and the final close at 30.
    fn fixture() -> (FinancialReport, Vec<PriceBar>) {
        let report = FinancialReport {
            rows: vec![
                eps_row(2023, 2.0),
                eps_row(2022, 1.5),
                eps_row(2021, 1.25),
                eps_row(2020, 1.1),
                eps_row(2019, 1.0),
            ],
        };
        let bars = vec![
            bar(2019, 1, 2, 10.0),
            bar(2020, 1, 2, 12.1),
            bar(2021, 1, 4, 10.0),
            bar(2021, 6, 1, 50.0), // later observation, ignored by first-close
            bar(2022, 1, 3, 15.0),
            bar(2023, 1, 2, 30.0),
            bar(2023, 12, 28, 30.0),
        ];
        (report, bars)
    }

    #[test]
    fn rate_literal_from_the_five_year_window() {
        // 1.46^(1/5) - 1
        let rate = compound_rate(5, 1.0, 1.46).unwrap();
        assert!((rate - 0.0786).abs() < 1e-4);
    }

    #[test]
    fn future_value_literal_over_ten_periods() {
        let fv = future_value(0.10, 10, 1.0);
        assert!((fv - 2.5937).abs() < 1e-4);
    }

    #[test]
    fn flat_eps_means_zero_growth() {
        assert_eq!(compound_rate(5, 1.23, 1.23).unwrap(), 0.0);
        assert_eq!(future_value(0.0, 10, 1.23), 1.23);
    }

    #[test]
    fn sign_change_has_no_real_rate() {
        let err = compound_rate(5, -1.0, 1.46).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn discounting_inverts_compounding() {
        let pv = present_value(0.15, 10, 32.0);
        assert!((pv - 7.9099).abs() < 1e-3);
        assert!((future_value(0.15, 10, pv) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn undervalued_ticker_is_a_buy() {
        let (report, bars) = fixture();
        let estimate = estimate(&report, &bars, 0.0, 0.0, &AppConfig::default()).unwrap();

        assert_eq!(estimate.annual_growth_rate, 0.15); // 2^(1/5)-1 rounded
        assert_eq!(estimate.last_eps, 1.0);
        assert_eq!(estimate.future_eps, 4.0); // (2^(1/5))^10 = 4
        assert_eq!(estimate.pe_ratio, 8.0); // 10.0 / 1.25 in 2021
        assert_eq!(estimate.future_value, 32.0);
        assert_eq!(estimate.present_value, 32.0);
        assert_eq!(estimate.margin_price, 32.0);
        assert_eq!(estimate.last_share_price, 30.0);
        assert_eq!(estimate.decision, Decision::Buy);
    }

    #[test]
    fn discount_and_margin_push_the_threshold_below_the_price() {
        let (report, bars) = fixture();
        let estimate = estimate(&report, &bars, 0.15, 0.15, &AppConfig::default()).unwrap();

        assert_eq!(estimate.present_value, 7.91);
        assert_eq!(estimate.margin_price, 6.72);
        assert_eq!(estimate.decision, Decision::Sell);
    }

    #[test]
    fn price_equal_to_margin_price_is_a_sell() {
        // Flat EPS keeps every figure exact: margin price and last close
        // are both 8.0.
        let report = FinancialReport {
            rows: vec![eps_row(2020, 1.0), eps_row(2019, 1.0)],
        };
        let bars = vec![bar(2019, 1, 2, 8.0), bar(2020, 12, 30, 8.0)];
        let estimate = estimate(&report, &bars, 0.0, 0.0, &AppConfig::default()).unwrap();

        assert_eq!(estimate.margin_price, 8.0);
        assert_eq!(estimate.last_share_price, 8.0);
        assert_eq!(estimate.decision, Decision::Sell);
    }

    #[test]
    fn negative_terminal_value_forces_margin_price_to_zero() {
        let report = FinancialReport {
            rows: vec![eps_row(2020, -2.0), eps_row(2019, -1.0)],
        };
        let bars = vec![bar(2019, 1, 2, 10.0), bar(2020, 12, 30, 10.0)];
        let estimate = estimate(&report, &bars, 0.15, 0.15, &AppConfig::default()).unwrap();

        assert!(estimate.future_value < 0.0);
        assert_eq!(estimate.margin_price, 0.0);
        assert_eq!(estimate.decision, Decision::Sell);
    }

    #[test]
    fn single_year_report_is_insufficient() {
        let report = FinancialReport {
            rows: vec![eps_row(2020, 1.0)],
        };
        let bars = vec![bar(2020, 1, 2, 10.0)];
        let err = estimate(&report, &bars, 0.15, 0.15, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn empty_price_history_is_insufficient() {
        let (report, _) = fixture();
        let err = estimate(&report, &[], 0.15, 0.15, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn disjoint_price_and_report_years_are_insufficient() {
        let (report, _) = fixture();
        let bars = vec![bar(2010, 1, 4, 10.0), bar(2011, 1, 3, 11.0)];
        let err = estimate(&report, &bars, 0.15, 0.15, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn out_of_range_rates_fail_validation() {
        let (report, bars) = fixture();
        for bad in [-0.1, 1.5, f64::NAN] {
            let err = estimate(&report, &bars, bad, 0.15, &AppConfig::default()).unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(_)));
        }
    }
}
