//! Benchmark comparison.

use crate::config::AnalysisConfig;
use crate::portfolio::summarize;
use crate::series::{rebase, AlignedSeries};
use crate::types::{PerformanceResult, ValueTrajectory};
use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Market index the portfolio is measured against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    /// Tokyo Stock Price Index
    #[default]
    Topix,
    /// Nikkei Stock Average
    Nikkei225,
}

impl Benchmark {
    /// Ticker the price source knows the index by.
    pub fn ticker(&self) -> &'static str {
        match self {
            Benchmark::Topix => "^TOPIX",
            Benchmark::Nikkei225 => "^N225",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Benchmark::Topix => "TOPIX",
            Benchmark::Nikkei225 => "Nikkei 225",
        }
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Benchmark {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "topix" | "^topix" => Ok(Benchmark::Topix),
            "nikkei225" | "nikkei" | "n225" | "^n225" => Ok(Benchmark::Nikkei225),
            other => Err(Error::InvalidConfig(format!("unknown benchmark: {}", other))),
        }
    }
}

/// Benchmark statistics computed over the same index as the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkComparison {
    pub benchmark: Benchmark,
    pub performance: PerformanceResult,
    /// Benchmark trajectory rebased to the same reference as the portfolio
    pub rebased: ValueTrajectory,
    /// Portfolio total return minus benchmark total return, in percentage points
    pub excess_return_pct: f64,
}

/// Apply rebasing and summary statistics to the aligned benchmark.
///
/// Returns `None` when the benchmark has no data in the window or no usable
/// baseline; the comparison is then omitted rather than reported as zero.
pub fn compare(
    aligned: &AlignedSeries,
    start: NaiveDate,
    end: NaiveDate,
    config: &AnalysisConfig,
    portfolio: &PerformanceResult,
) -> Option<BenchmarkComparison> {
    let prices = aligned.benchmark.as_ref()?;
    let trajectory = ValueTrajectory {
        dates: aligned.dates.clone(),
        values: prices.clone(),
    };

    let outcome = summarize(&trajectory, start, end, config.risk_free_rate).and_then(|performance| {
        rebase(&trajectory, config.reference_value).map(|rebased| (performance, rebased))
    });

    match outcome {
        Ok((performance, rebased)) => Some(BenchmarkComparison {
            benchmark: config.benchmark,
            excess_return_pct: portfolio.total_return_pct - performance.total_return_pct,
            performance,
            rebased,
        }),
        Err(e) => {
            warn!("Omitting {} comparison: {}", config.benchmark, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;
    use approx::assert_relative_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn aligned(benchmark: Option<Vec<f64>>) -> AlignedSeries {
        AlignedSeries {
            dates: vec![date(4), date(5), date(8)],
            benchmark,
            ..Default::default()
        }
    }

    fn portfolio_result(total_return_pct: f64) -> PerformanceResult {
        PerformanceResult {
            total_return_pct,
            annualized_return_pct: 0.0,
            annualized_volatility_pct: Metric::Value(0.0),
            risk_ratio: Metric::Value(0.0),
            max_drawdown_pct: 0.0,
            years_elapsed: 0.0,
            observations: 3,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_compare_present() {
        let config = AnalysisConfig::default();
        let aligned = aligned(Some(vec![2000.0, 2100.0, 2200.0]));

        let comparison =
            compare(&aligned, date(1), date(31), &config, &portfolio_result(15.0)).unwrap();

        assert_eq!(comparison.benchmark, Benchmark::Topix);
        assert_eq!(comparison.rebased.dates, aligned.dates);
        assert_eq!(comparison.rebased.values[0], 100.0);
        assert_relative_eq!(comparison.performance.total_return_pct, 10.0, epsilon = 1e-9);
        assert_relative_eq!(comparison.excess_return_pct, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compare_absent() {
        let config = AnalysisConfig::default();
        let comparison =
            compare(&aligned(None), date(1), date(31), &config, &portfolio_result(0.0));
        assert!(comparison.is_none());
    }

    #[test]
    fn test_compare_zero_baseline() {
        let config = AnalysisConfig::default();
        let aligned = aligned(Some(vec![0.0, 2100.0, 2200.0]));
        assert!(compare(&aligned, date(1), date(31), &config, &portfolio_result(0.0)).is_none());
    }

    #[test]
    fn test_benchmark_from_str() {
        assert_eq!("TOPIX".parse::<Benchmark>().unwrap(), Benchmark::Topix);
        assert_eq!("^N225".parse::<Benchmark>().unwrap(), Benchmark::Nikkei225);
        assert!("dow".parse::<Benchmark>().is_err());
        assert_eq!(Benchmark::Nikkei225.ticker(), "^N225");
    }
}
