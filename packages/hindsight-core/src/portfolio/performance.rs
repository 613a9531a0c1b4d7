//! Return statistics for a value trajectory.

use super::risk::{daily_returns, max_drawdown, risk_ratio, volatility};
use crate::types::{PerformanceResult, Unavailable, ValueTrajectory};
use crate::{Error, Result};
use chrono::NaiveDate;

/// Trading days per year used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calendar days per year used to annualize returns over a date span.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Summarize a trajectory observed between `start` and `end`.
///
/// Daily returns are taken from the values as given, so pass the unscaled
/// trajectory rather than a rebased one. Fails with [`Error::NoBaseline`] when
/// the trajectory is empty or starts at a non-positive value.
pub fn summarize(
    trajectory: &ValueTrajectory,
    start: NaiveDate,
    end: NaiveDate,
    risk_free_rate: f64,
) -> Result<PerformanceResult> {
    let first = match trajectory.first_value() {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => return Err(Error::NoBaseline),
    };
    let last = trajectory.last_value().unwrap_or(first);

    let total_return_pct = holding_period_return(first, last);
    let years_elapsed = (end - start).num_days() as f64 / DAYS_PER_YEAR;

    let mut notes = Vec::new();
    let annualized_return_pct = match annualize_return(total_return_pct, years_elapsed) {
        Some(r) => r,
        None => {
            notes.push(Unavailable::PeriodTooShort);
            0.0
        }
    };

    let returns = daily_returns(&trajectory.values);
    let annualized_volatility_pct = volatility(&returns);
    let risk_ratio = risk_ratio(&returns, risk_free_rate);

    for reason in [annualized_volatility_pct, risk_ratio]
        .iter()
        .filter_map(|m| m.unavailable())
    {
        if !notes.contains(&reason) {
            notes.push(reason);
        }
    }

    Ok(PerformanceResult {
        total_return_pct,
        annualized_return_pct,
        annualized_volatility_pct,
        risk_ratio,
        max_drawdown_pct: max_drawdown(&trajectory.values),
        years_elapsed,
        observations: trajectory.len(),
        notes,
    })
}

/// Calculate holding period return in percent.
pub fn holding_period_return(initial_value: f64, final_value: f64) -> f64 {
    if initial_value <= 0.0 {
        return 0.0;
    }
    (final_value / initial_value - 1.0) * 100.0
}

/// Annualize a total return in percent over `years`.
///
/// `None` when the span is not positive.
pub fn annualize_return(return_pct: f64, years: f64) -> Option<f64> {
    if years <= 0.0 {
        return None;
    }

    let growth = 1.0 + (return_pct / 100.0);
    if growth < 0.0 {
        return None;
    }

    let annualized = (growth.powf(1.0 / years) - 1.0) * 100.0;
    annualized.is_finite().then_some(annualized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trajectory(start: NaiveDate, values: Vec<f64>) -> ValueTrajectory {
        let dates = (0..values.len() as u64)
            .map(|i| start + chrono::Days::new(i))
            .collect();
        ValueTrajectory::new(dates, values).unwrap()
    }

    #[test]
    fn test_holding_period_return() {
        let hpr = holding_period_return(10000.0, 11500.0);
        assert!((hpr - 15.0).abs() < 0.01);
        assert_eq!(holding_period_return(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_annualize_return() {
        // 21% over two years is 10% a year
        let annualized = annualize_return(21.0, 2.0).unwrap();
        assert_relative_eq!(annualized, 10.0, epsilon = 1e-9);

        assert!(annualize_return(10.0, 0.0).is_none());
        assert!(annualize_return(10.0, -1.0).is_none());
    }

    #[test]
    fn test_summarize_flat() {
        let start = date(2024, 1, 1);
        let flat = trajectory(start, vec![100.0; 30]);

        let result = summarize(&flat, start, date(2024, 12, 31), 0.0).unwrap();

        assert_eq!(result.total_return_pct, 0.0);
        assert_eq!(result.annualized_return_pct, 0.0);
        assert_eq!(result.annualized_volatility_pct, Metric::Value(0.0));
        assert_eq!(
            result.risk_ratio,
            Metric::NotComputable(Unavailable::ZeroVariance)
        );
        assert_eq!(result.max_drawdown_pct, 0.0);
        assert_eq!(result.notes, vec![Unavailable::ZeroVariance]);
    }

    #[test]
    fn test_summarize_doubling_over_four_years() {
        // 1461 days is exactly four 365.25-day years; 16x is 2x a year
        let start = date(2020, 1, 1);
        let end = date(2024, 1, 1);
        let values = vec![100.0, 400.0, 800.0, 1600.0];

        let result = summarize(&trajectory(start, values), start, end, 0.0).unwrap();

        assert_relative_eq!(result.total_return_pct, 1500.0, epsilon = 1e-9);
        assert_relative_eq!(result.annualized_return_pct, 100.0, epsilon = 1e-9);
        assert_eq!(result.years_elapsed, 4.0);
    }

    #[test]
    fn test_summarize_zero_length_period() {
        let start = date(2024, 3, 1);
        let values = vec![100.0, 101.0, 99.0];

        let result = summarize(&trajectory(start, values), start, start, 0.0).unwrap();

        assert_eq!(result.annualized_return_pct, 0.0);
        assert!(result.notes.contains(&Unavailable::PeriodTooShort));
        assert_relative_eq!(result.total_return_pct, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_summarize_single_point() {
        let start = date(2024, 3, 1);
        let result = summarize(&trajectory(start, vec![100.0]), start, date(2024, 6, 1), 0.0)
            .unwrap();

        assert_eq!(result.total_return_pct, 0.0);
        assert_eq!(
            result.annualized_volatility_pct,
            Metric::NotComputable(Unavailable::InsufficientReturns)
        );
        assert_eq!(result.notes, vec![Unavailable::InsufficientReturns]);
    }

    #[test]
    fn test_summarize_no_baseline() {
        let start = date(2024, 3, 1);
        let end = date(2024, 6, 1);

        assert!(matches!(
            summarize(&ValueTrajectory::default(), start, end, 0.0),
            Err(Error::NoBaseline)
        ));
        assert!(matches!(
            summarize(&trajectory(start, vec![0.0, 5.0]), start, end, 0.0),
            Err(Error::NoBaseline)
        ));
    }

    #[test]
    fn test_summarize_is_pure() {
        let start = date(2023, 1, 2);
        let values = vec![1000.0, 1012.0, 998.0, 1030.0, 1025.0, 1041.0];
        let t = trajectory(start, values);

        let first = summarize(&t, start, date(2023, 7, 2), 0.0).unwrap();
        let second = summarize(&t, start, date(2023, 7, 2), 0.0).unwrap();

        assert_eq!(first, second);
    }
}
