//! Return-series risk statistics.
//!
//! Provides daily returns, annualized volatility, the risk ratio, and max drawdown.

use super::TRADING_DAYS_PER_YEAR;
use crate::types::{Metric, Unavailable};

/// Simple returns between consecutive values.
///
/// A step whose previous value is not positive has no defined return and is skipped.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Mean and sample standard deviation (n - 1), or `None` below two samples.
fn mean_and_stdev(returns: &[f64]) -> Option<(f64, f64)> {
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some((mean, variance.sqrt()))
}

/// Annualized volatility in percent: `stdev(r) * sqrt(252) * 100`.
pub fn volatility(returns: &[f64]) -> Metric {
    match mean_and_stdev(returns) {
        Some((_, std)) => Metric::finite_or(
            std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0,
            Unavailable::InsufficientReturns,
        ),
        None => Metric::NotComputable(Unavailable::InsufficientReturns),
    }
}

/// Annualized risk-adjusted return.
///
/// `(mean(r) * 252 - risk_free_rate) / (stdev(r) * sqrt(252))`. Not computable
/// when the returns have no variance.
pub fn risk_ratio(returns: &[f64], risk_free_rate: f64) -> Metric {
    let (mean, std) = match mean_and_stdev(returns) {
        Some(stats) => stats,
        None => return Metric::NotComputable(Unavailable::InsufficientReturns),
    };

    if std <= 0.0 {
        return Metric::NotComputable(Unavailable::ZeroVariance);
    }

    let annual_return = mean * TRADING_DAYS_PER_YEAR;
    let annual_std = std * TRADING_DAYS_PER_YEAR.sqrt();

    Metric::finite_or(
        (annual_return - risk_free_rate) / annual_std,
        Unavailable::ZeroVariance,
    )
}

/// Largest peak-to-trough decline of a value series, in percent.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut running_max = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0;

    for &value in values {
        if value > running_max {
            running_max = value;
        }
        if running_max > 0.0 {
            let drawdown = (running_max - value) / running_max;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown * 100.0
}
