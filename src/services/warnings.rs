// src/services/warnings.rs
use crate::config::WarningThresholds;
use crate::error::AnalysisError;
use crate::models::{FinancialReport, ReportRow, WarningFlag};

/// Apply the four threshold rules to a normalized report. Rules are
/// independent and never short-circuit each other; flags come back in rule
/// order. All required fields are validated before any rule runs, so a bad
/// row fails the whole evaluation rather than producing a partial answer.
pub fn evaluate_warnings(
    report: &FinancialReport,
    thresholds: &WarningThresholds,
) -> Result<Vec<WarningFlag>, AnalysisError> {
    validate_report(report)?;

    let mut flags = Vec::new();

    // Rule 1: EPS growth deceleration, compared in chronological order.
    let chronological: Vec<&ReportRow> = report.chronological().collect();
    let mut slowing_years: Vec<i32> = Vec::new();
    for pair in chronological.windows(2) {
        if pair[1].eps_growth < pair[0].eps_growth {
            slowing_years.push(pair[1].year);
        }
    }
    if !slowing_years.is_empty() {
        // Newest first in the message text.
        slowing_years.sort_unstable_by(|a, b| b.cmp(a));
        let years = slowing_years
            .iter()
            .map(|year| year.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        flags.push(WarningFlag::new(format!(
            "Há redução do crescimento em {}",
            years
        )));
    }

    // Rule 2: mean ROE below the floor.
    let mean_roe = mean(report.rows.iter().map(|row| row.roe));
    if mean_roe < thresholds.roe_floor {
        flags.push(WarningFlag::new(format!(
            "A média do ROE é de {:.2}, menor que {:.2}",
            mean_roe, thresholds.roe_floor
        )));
    }

    // Rule 3: mean ROA below the floor.
    let mean_roa = mean(report.rows.iter().map(|row| row.roa));
    if mean_roa < thresholds.roa_floor {
        flags.push(WarningFlag::new(format!(
            "A média do ROA é de {:.2}, menor que {:.2}",
            mean_roa, thresholds.roa_floor
        )));
    }

    // Rule 4: excessive leverage, judged on the most recent year only.
    if let Some(latest) = report.latest() {
        if latest.total_long_term_debt > thresholds.debt_to_income_multiple * latest.net_income {
            flags.push(WarningFlag::new(
                "A Dívida de Longo Prazo é cinco vezes o Lucro Líquido.",
            ));
        }
    }

    Ok(flags)
}

fn validate_report(report: &FinancialReport) -> Result<(), AnalysisError> {
    if report.rows.is_empty() {
        return Err(AnalysisError::Validation(
            "report has no rows to evaluate".to_string(),
        ));
    }
    for row in &report.rows {
        let fields = [
            ("Diluted Normalized EPS", row.diluted_normalized_eps),
            ("EPS Growth", row.eps_growth),
            ("Net Income", row.net_income),
            ("Shareholders Equity", row.shareholders_equity),
            ("ROA", row.roa),
            ("Total Long Term Debt", row.total_long_term_debt),
            ("EBIT", row.ebit),
            ("ROE", row.roe),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::Validation(format!(
                    "{} for {} is not a number",
                    name, row.year
                )));
            }
        }
    }
    Ok(())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, eps_growth: f64, roe: f64, roa: f64, debt: f64, net_income: f64) -> ReportRow {
        ReportRow {
            year,
            diluted_normalized_eps: 1.0,
            eps_growth,
            net_income,
            shareholders_equity: 100.0,
            roa,
            total_long_term_debt: debt,
            ebit: net_income,
            roe,
        }
    }

    /// Rows are given newest first, matching the normalizer's output.
    fn report(rows: Vec<ReportRow>) -> FinancialReport {
        FinancialReport { rows }
    }

    fn thresholds() -> WarningThresholds {
        WarningThresholds::default()
    }

    #[test]
    fn healthy_report_raises_no_flags() {
        let report = report(vec![
            row(2021, 0.3, 0.22, 0.10, 100.0, 100.0),
            row(2020, 0.2, 0.18, 0.10, 100.0, 100.0),
            row(2019, 0.0, 0.20, 0.10, 100.0, 100.0),
        ]);
        assert!(evaluate_warnings(&report, &thresholds()).unwrap().is_empty());
    }

    #[test]
    fn low_mean_roe_is_flagged_with_the_mean() {
        // Mean 0.0767 rounds to 0.08 in the message.
        let report = report(vec![
            row(2021, 0.0, 0.05, 0.10, 0.0, 100.0),
            row(2020, 0.0, 0.08, 0.10, 0.0, 100.0),
            row(2019, 0.0, 0.10, 0.10, 0.0, 100.0),
        ]);
        let flags = evaluate_warnings(&report, &thresholds()).unwrap();
        assert_eq!(flags.len(), 1);
        assert!(flags[0].reason.contains("ROE"));
        assert!(flags[0].reason.contains("0.08"));
    }

    #[test]
    fn roe_flag_is_monotonic_in_the_mean() {
        let low = report(vec![
            row(2020, 0.0, 0.10, 0.10, 0.0, 100.0),
            row(2019, 0.0, 0.12, 0.10, 0.0, 100.0),
        ]);
        let raised = report(vec![
            row(2020, 0.0, 0.20, 0.10, 0.0, 100.0),
            row(2019, 0.0, 0.18, 0.10, 0.0, 100.0),
        ]);
        assert_eq!(evaluate_warnings(&low, &thresholds()).unwrap().len(), 1);
        assert!(evaluate_warnings(&raised, &thresholds()).unwrap().is_empty());
    }

    #[test]
    fn low_mean_roa_is_flagged_independently_of_roe() {
        let report = report(vec![
            row(2020, 0.0, 0.20, 0.05, 0.0, 100.0),
            row(2019, 0.0, 0.20, 0.06, 0.0, 100.0),
        ]);
        let flags = evaluate_warnings(&report, &thresholds()).unwrap();
        assert_eq!(flags.len(), 1);
        assert!(flags[0].reason.contains("ROA"));
    }

    #[test]
    fn leverage_flag_uses_only_the_latest_year() {
        let flagged = report(vec![
            row(2020, 0.0, 0.20, 0.10, 1000.0, 100.0),
            row(2019, 0.0, 0.20, 0.10, 0.0, 100.0),
        ]);
        let flags = evaluate_warnings(&flagged, &thresholds()).unwrap();
        assert_eq!(flags.len(), 1);
        assert!(flags[0].reason.contains("Dívida"));

        // Older years cannot toggle the flag in either direction.
        let old_debt_only = report(vec![
            row(2020, 0.0, 0.20, 0.10, 400.0, 100.0),
            row(2019, 0.0, 0.20, 0.10, 99999.0, 1.0),
        ]);
        assert!(evaluate_warnings(&old_debt_only, &thresholds())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn deceleration_lists_offending_years_newest_first() {
        // Chronological growths: 2019 0.0, 2020 0.3, 2021 0.2, 2022 0.1.
        let report = report(vec![
            row(2022, 0.1, 0.20, 0.10, 0.0, 100.0),
            row(2021, 0.2, 0.20, 0.10, 0.0, 100.0),
            row(2020, 0.3, 0.20, 0.10, 0.0, 100.0),
            row(2019, 0.0, 0.20, 0.10, 0.0, 100.0),
        ]);
        let flags = evaluate_warnings(&report, &thresholds()).unwrap();
        assert_eq!(flags.len(), 1);
        assert!(flags[0].reason.contains("2022, 2021"));
        assert!(!flags[0].reason.contains("2020"));
    }

    #[test]
    fn flags_come_back_in_rule_order() {
        let report = report(vec![
            row(2020, 0.05, 0.05, 0.01, 1000.0, 100.0),
            row(2019, 0.10, 0.05, 0.01, 0.0, 100.0),
        ]);
        let flags = evaluate_warnings(&report, &thresholds()).unwrap();
        assert_eq!(flags.len(), 4);
        assert!(flags[0].reason.contains("redução do crescimento"));
        assert!(flags[1].reason.contains("ROE"));
        assert!(flags[2].reason.contains("ROA"));
        assert!(flags[3].reason.contains("Dívida"));
    }

    #[test]
    fn non_finite_fields_fail_validation_before_any_rule() {
        let bad = row(2020, 0.0, f64::NAN, 0.10, 0.0, 100.0);
        let report = report(vec![bad, row(2019, 0.0, 0.20, 0.10, 0.0, 100.0)]);
        let err = evaluate_warnings(&report, &thresholds()).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
    }

    #[test]
    fn empty_report_fails_validation() {
        let err = evaluate_warnings(&report(Vec::new()), &thresholds()).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
    }
}
